//! Derived views over already-fetched lists.
//!
//! Pure functions of their input; none of them touch the network. Stores
//! expose the same views over their current snapshot.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::types::{Activity, HouseNumber, Product, Shop};

/// Activities scheduled within `[start, end]`, in list order.
pub fn activities_in_range(
    activities: &[Activity],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<Activity> {
    activities
        .iter()
        .filter(|a| a.scheduled_time().is_some_and(|t| t >= start && t <= end))
        .cloned()
        .collect()
}

/// Activities strictly after `now`, soonest first.
pub fn upcoming_activities(activities: &[Activity], now: DateTime<Utc>) -> Vec<Activity> {
    let mut timed: Vec<(DateTime<Utc>, &Activity)> = activities
        .iter()
        .filter_map(|a| a.scheduled_time().map(|t| (t, a)))
        .filter(|(t, _)| *t > now)
        .collect();
    timed.sort_by_key(|(t, _)| *t);
    timed.into_iter().map(|(_, a)| a.clone()).collect()
}

/// Activities strictly before `now`, most recent first.
pub fn past_activities(activities: &[Activity], now: DateTime<Utc>) -> Vec<Activity> {
    let mut timed: Vec<(DateTime<Utc>, &Activity)> = activities
        .iter()
        .filter_map(|a| a.scheduled_time().map(|t| (t, a)))
        .filter(|(t, _)| *t < now)
        .collect();
    timed.sort_by(|(a, _), (b, _)| b.cmp(a));
    timed.into_iter().map(|(_, a)| a.clone()).collect()
}

pub fn house_numbers_by_block(house_numbers: &[HouseNumber], block_id: u64) -> Vec<HouseNumber> {
    house_numbers
        .iter()
        .filter(|h| h.block_id == block_id)
        .cloned()
        .collect()
}

pub fn products_by_shop(products: &[Product], shop_id: &str) -> Vec<Product> {
    products
        .iter()
        .filter(|p| p.shop_id == shop_id)
        .cloned()
        .collect()
}

pub fn products_by_category(products: &[Product], category_id: u64) -> Vec<Product> {
    products
        .iter()
        .filter(|p| p.category_id == category_id)
        .cloned()
        .collect()
}

/// Home-page recommendations: the category's products (all products when
/// no category is selected) in shuffled order.
pub fn recommended_products<R>(
    products: &[Product],
    category_id: Option<u64>,
    rng: &mut R,
) -> Vec<Product>
where
    R: Rng + ?Sized,
{
    let mut picked = match category_id {
        Some(id) => products_by_category(products, id),
        None => products.to_vec(),
    };
    picked.shuffle(rng);
    picked
}

pub fn shops_in_block(shops: &[Shop], block_id: u64) -> Vec<Shop> {
    shops.iter().filter(|s| s.block_id == block_id).cloned().collect()
}

/// Display name of a shop, or `"Unknown Store"`.
pub fn shop_name<'a>(shops: &'a [Shop], shop_id: &str) -> &'a str {
    shops
        .iter()
        .find(|s| s.id == shop_id)
        .map_or("Unknown Store", |s| s.name.as_str())
}
