use chrono::Utc;
use tlshop_api::models::User;
use uuid::Uuid;

// The stored credential hash must never appear in a serialized user row.
#[test]
fn user_response_omits_password_hash() {
    let user = User {
        id: Uuid::new_v4(),
        email: "shopper@example.com".into(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
        role: "user".into(),
        created_at: Utc::now(),
    };

    let json = serde_json::to_value(&user).unwrap();
    assert!(json.get("password_hash").is_none());
    assert_eq!(json["email"], "shopper@example.com");
    assert_eq!(json["role"], "user");
}
