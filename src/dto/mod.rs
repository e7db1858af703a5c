pub mod carts;
pub mod products;
