use finman_domain::constants::{
    BUDGET_PLANS, ENCRYPTION_KEY_ENV, MAC_KEY_ENV, TRANSACTIONS, USERNAME_FIELD, USERS,
};

#[test]
fn constants_match_stored_names() {
    assert_eq!(USERS, "Users");
    assert_eq!(TRANSACTIONS, "Transaction");
    assert_eq!(BUDGET_PLANS, "BudgetPlan");
    assert_eq!(USERNAME_FIELD, "Username");
    assert_eq!(ENCRYPTION_KEY_ENV, "AES_ENCRYPTION_KEY");
    assert_eq!(MAC_KEY_ENV, "HMAC_KEY");
}
