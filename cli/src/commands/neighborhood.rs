//! Categories, blocks and house numbers.

use catalog_core::{Block, Category, HouseNumber, ResourceStore, Route};

use super::Session;

pub async fn categories(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    let store = session.load::<Category>().await?;
    for category in store.items().await {
        println!("{:>4}  {}", category.id, category.name);
    }
    Ok(())
}

pub async fn blocks(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    let store = session.load::<Block>().await?;
    for block in store.items().await {
        println!("{:>4}  {:<20} {}", block.id, block.name, Route::Block(block.id));
    }
    Ok(())
}

/// One block with the shops the backend embeds in it.
pub async fn block(session: &Session, id: u64) -> Result<(), Box<dyn std::error::Error>> {
    let block = session.api.get::<Block>(&id).await?;
    println!("{}", block.name);
    if let Some(description) = &block.description {
        println!("  {description}");
    }
    let shops = block.shops.unwrap_or_default();
    if shops.is_empty() {
        println!("  No shops in this block.");
    }
    for shop in &shops {
        println!("  {:<32} {:<16} {}", shop.name, shop.address, Route::Store(shop.id.clone()));
    }
    Ok(())
}

pub async fn house_numbers(session: &Session, block: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let store: ResourceStore<HouseNumber, _> = session.load().await?;
    let numbers = match block {
        Some(block_id) => store.by_block(block_id).await,
        None => store.items().await,
    };
    if numbers.is_empty() {
        println!("No house numbers found.");
    }
    for number in &numbers {
        println!("{:>4}  {:<8} block {}", number.id, number.number, number.block_id);
    }
    Ok(())
}
