//! `sentra products ...`

use catalog_core::format::format_rupiah;
use catalog_core::selectors::{products_by_category, shop_name};
use catalog_core::{MediaKind, Product, ResourceStore, Shop};
use tracing::info;

use super::Session;

fn product_line(product: &Product, shops: &[Shop]) -> String {
    format!(
        "{:<10} {:<32} {:>12}  {}",
        product.id,
        product.name,
        format_rupiah(product.price),
        shop_name(shops, &product.shop_id)
    )
}

fn print_products(products: &[Product], shops: &[Shop]) {
    if products.is_empty() {
        println!("No products found.");
    }
    for product in products {
        println!("{}", product_line(product, shops));
    }
}

pub async fn list(session: &Session, category: Option<u64>) -> Result<(), Box<dyn std::error::Error>> {
    let (products, shops) = tokio::try_join!(session.load::<Product>(), session.load::<Shop>())?;
    let mut items = products.items().await;
    if let Some(category) = category {
        items = products_by_category(&items, category);
    }
    info!(count = items.len(), "Loaded products");
    print_products(&items, &shops.items().await);
    Ok(())
}

pub async fn show(session: &Session, id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let product = session.api.get::<Product>(&id.to_string()).await?;
    let shop = session.api.get::<Shop>(&product.shop_id).await.ok();
    let photo = session.media().resolve_versioned(
        product.photo.as_deref(),
        MediaKind::Product,
        product.updated_at.as_deref(),
    );

    println!("{}", product.name);
    println!("  Price:    {}", format_rupiah(product.price));
    if let Some(stock) = product.stock {
        println!("  Stock:    {stock}");
    }
    println!(
        "  Shop:     {}",
        shop.as_ref().map_or("Unknown Store", |s| s.name.as_str())
    );
    if let Some(description) = &product.description {
        println!("  About:    {description}");
    }
    println!("  Photo:    {}", photo.src);
    Ok(())
}

pub async fn by_shop(session: &Session, shop_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    let store = ResourceStore::<Product, _>::new(session.api.clone());
    store.fetch_by_shop(shop_id).await;
    if let Some(message) = store.error().await {
        return Err(message.into());
    }
    let shop = session.api.get::<Shop>(&shop_id.to_string()).await?;
    println!("Products from {}", shop.name);
    print_products(&store.items().await, std::slice::from_ref(&shop));
    Ok(())
}

pub async fn recommended(
    session: &Session,
    category: Option<u64>,
    limit: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let (products, shops) = tokio::try_join!(session.load::<Product>(), session.load::<Shop>())?;
    let mut rng = rand::rng();
    let picks = products.recommended(category, &mut rng).await;
    print_products(&picks[..picks.len().min(limit)], &shops.items().await);
    Ok(())
}
