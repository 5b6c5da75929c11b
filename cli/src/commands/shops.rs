//! `sentra shops ...`

use catalog_core::format::format_rupiah;
use catalog_core::{Block, MediaKind, Shop};

use super::Session;

fn block_name(blocks: &[Block], block_id: u64) -> String {
    blocks
        .iter()
        .find(|b| b.id == block_id)
        .map_or_else(|| format!("Block {block_id}"), |b| b.name.clone())
}

pub async fn list(session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    let (shops, blocks) = tokio::try_join!(session.load::<Shop>(), session.load::<Block>())?;
    let blocks = blocks.items().await;
    let shops = shops.items().await;
    if shops.is_empty() {
        println!("No shops found.");
    }
    for shop in &shops {
        println!(
            "{:<10} {:<32} {:<16} {}",
            shop.id,
            shop.name,
            block_name(&blocks, shop.block_id),
            shop.owner
        );
    }
    Ok(())
}

pub async fn show(session: &Session, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let id = id.to_string();
    let (shop, products) = tokio::try_join!(
        session.api.get::<Shop>(&id),
        session.api.products_by_shop(&id)
    )?;
    let photo = session.media().resolve_versioned(
        shop.photo.as_deref(),
        MediaKind::Shop,
        shop.updated_at.as_deref(),
    );

    println!("{}", shop.name);
    println!("  Owner:    {}", shop.owner);
    println!("  Address:  {}", shop.address);
    if let Some(description) = &shop.description {
        println!("  About:    {description}");
    }
    println!("  Photo:    {}", photo.src);
    println!("  Products: {}", products.len());
    for product in &products {
        println!("    {:<32} {:>12}", product.name, format_rupiah(product.price));
    }
    Ok(())
}
