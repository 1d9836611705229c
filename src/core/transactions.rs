use crate::constants::{
    ADD_EXPENSE_FUNCTION, CONTRACT_MODULE, SETTLE_EXPENSE_FUNCTION, TEST_EXPENSE_AMOUNT_MICRO, TEST_EXPENSE_DESCRIPTION,
};
use crate::core::draft::{SplitShare, ValidatedExpense};
use crate::core::errors::GathrfiError;
use crate::core::models::{Address, Coin, ObjectId, ProgrammableTransaction, PureValue};

/// `gathrfi::add_expense(amount, description, members, amounts)`.
pub fn add_expense(package: &str, expense: &ValidatedExpense) -> ProgrammableTransaction {
    let mut tx = ProgrammableTransaction::new();
    let amount = tx.pure(PureValue::U64(expense.total));
    let description = tx.pure(PureValue::VectorU8(expense.description.as_bytes().to_vec()));
    let members = tx.pure(PureValue::VectorAddress(
        expense.shares.iter().map(|s| s.address.to_string()).collect(),
    ));
    let amounts = tx.pure(PureValue::VectorU64(expense.shares.iter().map(|s| s.amount).collect()));
    tx.move_call(
        package,
        CONTRACT_MODULE,
        ADD_EXPENSE_FUNCTION,
        vec![amount, description, members, amounts],
    );
    tx
}

/// 100 USDC owed entirely by `account`, used to smoke-test the deployed contract.
pub fn test_expense(account: &Address) -> ValidatedExpense {
    ValidatedExpense {
        description: TEST_EXPENSE_DESCRIPTION.to_string(),
        total: TEST_EXPENSE_AMOUNT_MICRO,
        shares: vec![SplitShare {
            address: account.clone(),
            amount: TEST_EXPENSE_AMOUNT_MICRO,
        }],
    }
}

/// Merges every coin into the first one, pays the expense from it and sends
/// the remainder back to `recipient`.
pub fn settle_expense(
    package: &str,
    expense_id: &ObjectId,
    coins: &[Coin],
    recipient: &Address,
) -> Result<ProgrammableTransaction, GathrfiError> {
    let (primary, rest) = coins
        .split_first()
        .ok_or_else(|| GathrfiError::NoCoins(recipient.to_string()))?;

    let mut tx = ProgrammableTransaction::new();
    let coin = tx.object(&primary.coin_object_id);
    if !rest.is_empty() {
        let sources: Vec<_> = rest.iter().map(|c| tx.object(&c.coin_object_id)).collect();
        tx.merge_coins(coin, sources);
    }
    let expense = tx.object(expense_id);
    let remaining = tx.move_call(package, CONTRACT_MODULE, SETTLE_EXPENSE_FUNCTION, vec![expense, coin]);
    let recipient = tx.pure(PureValue::Address(recipient.to_string()));
    tx.transfer_objects(vec![remaining], recipient);
    Ok(tx)
}
