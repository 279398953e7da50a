use std::{sync::Arc, thread};

use kankri::{
    auth::DigestHashMaker, logging::try_init_test_logging, AuthError, Authenticator, ErrorExt,
    GrantSpec, HashAlgorithm, HashSettings, PrivilegeSet, PrivilegeSubject, StatusCode,
    UserRecord, UsersConfig,
};
use rstest::{fixture, rstest};

const CHANNEL_CONFIG: &str = r#"{
    "test": {
        "password": "hunter2",
        "privileges": {
            "channel_set": ["get"],
            "channel": "all"
        }
    }
}"#;

#[fixture]
fn authenticator() -> Authenticator {
    try_init_test_logging();
    let config = UsersConfig::from_json(CHANNEL_CONFIG).unwrap();
    Authenticator::from_config(&config).unwrap()
}

/// Scenario from the channel_set/channel table.
#[rstest]
fn test_valid_credentials_return_configured_privileges(authenticator: Authenticator) {
    let privs = authenticator.authenticate("test", "hunter2").unwrap();
    assert!(privs.has("get", "channel_set"));
    assert!(!privs.has("put", "channel_set"));
    assert!(privs.has("get", "channel"));
    assert!(privs.has("put", "channel"));
    assert!(!privs.has("get", "player"));
    assert!(!privs.has("put", "player"));
}

#[rstest]
fn test_owned_strings_authenticate_like_literals(authenticator: Authenticator) {
    let username = String::from("test");
    let password = String::from("hunter2");
    let a = authenticator.authenticate(&username, &password).unwrap();
    let b = authenticator.authenticate("test", "hunter2").unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}

#[rstest]
#[case::unknown_user("wrong", "hunter2")]
#[case::wrong_password("test", "wrong")]
#[case::blank_password("test", "")]
#[case::blank_username("", "hunter2")]
#[case::username_case("TEST", "hunter2")]
#[case::trailing_space("test", "hunter2 ")]
fn test_rejections_are_undifferentiated(
    authenticator: Authenticator,
    #[case] username: &str,
    #[case] password: &str,
) {
    let err = authenticator.authenticate(username, password).unwrap_err();
    assert_eq!(err, AuthError::AuthenticationFailure);
    assert_eq!(err.status_code(), StatusCode::AuthFailed);
    assert_eq!(err.client_message(), "Authentication failed");
}

#[test]
fn test_admin_scenario() {
    let auth = kankri::authenticator_from_users([(
        "admin",
        UserRecord::new("hunter2")
            .with_grant("foo", GrantSpec::all())
            .with_grant("bar", vec!["abc", "def", "ghi"])
            .with_grant("baz", Vec::<String>::new()),
    )])
    .unwrap();

    assert!(auth.authenticate("admin", "wrong").is_err());

    let privs = auth.authenticate("admin", "hunter2").unwrap();
    assert!(privs.has("abc", "bar"));
    assert!(!privs.has("xyz", "bar"));
    assert!(privs.has("anything", "foo"));
    assert!(!privs.has("anything", "baz"));
    assert!(privs.require("baz", "anything").is_err());
    assert!(privs.require("qux", "anything").is_err());
    assert!(privs.require("foo", "anything").is_ok());
}

#[test]
fn test_returned_set_matches_configured_privileges() {
    let config = UsersConfig::from_json(CHANNEL_CONFIG).unwrap();
    let auth = Authenticator::from_config(&config).unwrap();
    let specs = config.users["test"].privileges.as_ref().unwrap();
    let expected = PrivilegeSet::from_specs(specs).unwrap();
    assert_eq!(*auth.authenticate("test", "hunter2").unwrap(), expected);
}

#[test]
fn test_two_instances_use_independent_salts() {
    let config = UsersConfig::from_json(CHANNEL_CONFIG).unwrap();
    let a = Authenticator::from_config(&config).unwrap();
    let b = Authenticator::from_config(&config).unwrap();

    assert_ne!(a.hasher_for("test"), b.hasher_for("test"));
    assert_ne!(a.hashed_password_for("test"), b.hashed_password_for("test"));

    for (user, pass) in [("test", "hunter2"), ("test", "nope"), ("nobody", "hunter2")] {
        assert_eq!(
            a.authenticate(user, pass).is_ok(),
            b.authenticate(user, pass).is_ok()
        );
    }
}

#[test]
fn test_missing_field_in_config_is_fatal() {
    let config = UsersConfig::from_json(r#"{ "test": { "password": "hunter2" } }"#).unwrap();
    let err = Authenticator::from_config(&config).unwrap_err();
    assert!(err.is_misconfiguration());
    assert_eq!(err.status_code(), StatusCode::InvalidConfig);
}

#[test]
fn test_settings_drive_the_hash_maker() {
    let config = UsersConfig::from_json(CHANNEL_CONFIG).unwrap();
    let settings = HashSettings {
        algorithm: HashAlgorithm::Sha512,
        salt_len: 32,
    };
    let auth = Authenticator::from_config_with_settings(&config, &settings).unwrap();
    let hasher = auth.hasher_for("test").unwrap();
    assert_eq!(hasher.algorithm(), HashAlgorithm::Sha512);
    assert_eq!(hasher.salt().len(), 32);
    assert!(auth.authenticate("test", "hunter2").is_ok());
}

#[rstest]
#[case(0)]
#[case(4)]
#[case(4096)]
fn test_out_of_range_salt_len_is_rejected(#[case] salt_len: usize) {
    let config = UsersConfig::from_json(CHANNEL_CONFIG).unwrap();
    let settings = HashSettings {
        algorithm: HashAlgorithm::Sha256,
        salt_len,
    };
    let err = Authenticator::from_config_with_settings(&config, &settings).unwrap_err();
    assert!(matches!(err, AuthError::InvalidHashSettings { .. }));
    assert!(err.is_misconfiguration());
    assert_eq!(err.status_code(), StatusCode::InvalidConfig);
}

#[test]
fn test_minimum_salt_still_gives_independent_instances() {
    let config = UsersConfig::from_json(CHANNEL_CONFIG).unwrap();
    let settings = HashSettings {
        algorithm: HashAlgorithm::Sha256,
        salt_len: kankri::auth::MIN_SALT_LEN,
    };
    let a = Authenticator::from_config_with_settings(&config, &settings).unwrap();
    let b = Authenticator::from_config_with_settings(&config, &settings).unwrap();
    assert_ne!(a.hasher_for("test").unwrap().salt(), b.hasher_for("test").unwrap().salt());
    assert_ne!(a.hashed_password_for("test"), b.hashed_password_for("test"));
    assert!(a.authenticate("test", "hunter2").is_ok());
    assert!(b.authenticate("test", "hunter2").is_ok());
}

#[test]
fn test_hash_maker_sees_every_username_once() {
    use std::{collections::HashMap, sync::Mutex};

    use kankri::{HashMaker, Hasher, Key};

    struct Recording {
        seen: Mutex<Vec<Key>>,
    }

    impl HashMaker for Recording {
        fn make_hashers(
            &self,
            usernames: &[Key],
        ) -> HashMap<Key, Hasher> {
            self.seen.lock().unwrap().extend_from_slice(usernames);
            DigestHashMaker::default().make_hashers(usernames)
        }
    }

    let maker = Recording {
        seen: Mutex::new(Vec::new()),
    };
    let users = [
        ("alf", UserRecord::new("a")),
        ("bob", UserRecord::new("b")),
    ];
    let auth = Authenticator::with_hash_maker(users, &maker).unwrap();

    let mut seen = maker.seen.into_inner().unwrap();
    seen.sort();
    assert_eq!(seen, vec![Key::from("alf"), Key::from("bob")]);
    assert_eq!(auth.len(), 2);
}

#[test]
fn test_shared_across_threads() {
    let config = UsersConfig::from_json(CHANNEL_CONFIG).unwrap();
    let auth = Arc::new(Authenticator::from_config(&config).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let auth = Arc::clone(&auth);
            thread::spawn(move || {
                let password = if i % 2 == 0 { "hunter2" } else { "wrong" };
                match auth.authenticate("test", password) {
                    Ok(privs) => privs.has("put", "channel"),
                    Err(_) => false,
                }
            })
        })
        .collect();

    let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for (i, ok) in results.into_iter().enumerate() {
        assert_eq!(ok, i % 2 == 0);
    }
}

struct Channel;

impl PrivilegeSubject for Channel {
    fn privilege_key(&self) -> &str {
        "channel_set"
    }
}

#[rstest]
fn test_subject_delegates_to_authenticated_set(authenticator: Authenticator) {
    let privs = authenticator.authenticate("test", "hunter2").unwrap();
    assert!(Channel.can("get", &privs));
    assert!(!Channel.can("put", &privs));
    assert_eq!(
        Channel.fail_if_cannot("put", &privs),
        Err(AuthError::InsufficientPrivilege {
            target: "channel_set".into(),
            privilege: "put".into(),
        })
    );
}

#[test]
fn test_authenticator_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Authenticator>();
    assert_send_sync::<PrivilegeSet>();
}
