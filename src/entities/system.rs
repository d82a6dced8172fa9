/// Administrative account that signs automated notices and reviews
/// publication requests.
pub const SYSTEM_USER_ID: i64 = 1;
pub const PUBLICATION_REVIEWER_ID: i64 = SYSTEM_USER_ID;
