use super::*;
use proptest::prelude::*;

fn arb_config() -> impl Strategy<Value = Config> {
    ("[a-z_./]{1,30}", "[0-9.:]{1,21}", "[ -~]{1,40}", 1i64..10_000, 1i64..365, 1i32..1000).prop_map(
        |(database_url, bind_address, jwt_secret_key, access_token_minutes, refresh_token_days, admin_user_id)| Config {
            database_url,
            bind_address,
            jwt_secret_key,
            access_token_minutes,
            refresh_token_days,
            admin_user_id,
        },
    )
}

fn arb_config_update() -> impl Strategy<Value = ConfigUpdate> {
    (
        prop::option::of("[a-z_./]{1,30}"),
        prop::option::of("[0-9.:]{1,21}"),
        prop::option::of("[ -~]{1,40}"),
        prop::option::of(1i64..10_000),
        prop::option::of(1i64..365),
        prop::option::of(1i32..1000),
    )
        .prop_map(
            |(database_url, bind_address, jwt_secret_key, access_token_minutes, refresh_token_days, admin_user_id)| {
                ConfigUpdate {
                    database_url,
                    bind_address,
                    jwt_secret_key,
                    access_token_minutes,
                    refresh_token_days,
                    admin_user_id,
                }
            },
        )
}

proptest! {
    /// An empty update leaves the configuration unchanged
    #[test]
    fn prop_empty_update_is_identity(config in arb_config()) {
        prop_assert_eq!(config.clone().apply_update(ConfigUpdate::default()), config);
    }

    /// Every field present in the update wins, every absent field is kept
    #[test]
    fn prop_update_fields_override(config in arb_config(), update in arb_config_update()) {
        let updated = config.clone().apply_update(update.clone());

        prop_assert_eq!(updated.database_url, update.database_url.unwrap_or(config.database_url));
        prop_assert_eq!(updated.bind_address, update.bind_address.unwrap_or(config.bind_address));
        prop_assert_eq!(updated.jwt_secret_key, update.jwt_secret_key.unwrap_or(config.jwt_secret_key));
        prop_assert_eq!(updated.access_token_minutes, update.access_token_minutes.unwrap_or(config.access_token_minutes));
        prop_assert_eq!(updated.refresh_token_days, update.refresh_token_days.unwrap_or(config.refresh_token_days));
        prop_assert_eq!(updated.admin_user_id, update.admin_user_id.unwrap_or(config.admin_user_id));
    }

    /// Applying the same update twice is the same as applying it once
    #[test]
    fn prop_apply_update_is_idempotent(config in arb_config(), update in arb_config_update()) {
        let once = config.clone().apply_update(update.clone());
        let twice = once.clone().apply_update(update);
        prop_assert_eq!(once, twice);
    }

    /// Token lifetimes are derived from the configured units
    #[test]
    fn prop_token_ttls_match_units(config in arb_config()) {
        prop_assert_eq!(config.access_token_ttl().num_minutes(), config.access_token_minutes);
        prop_assert_eq!(config.refresh_token_ttl().num_days(), config.refresh_token_days);
    }
}
