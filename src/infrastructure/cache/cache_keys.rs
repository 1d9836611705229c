use crate::core::models::Address;

pub fn balance_key(owner: &Address, coin_type: &str) -> String {
    format!("balance:{}:{}", owner, coin_type)
}
