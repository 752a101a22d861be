#[cfg(test)]
pub mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use confique::Config;
    use serde::{Deserialize, Serialize};

    use crate::metadata::MetadataKey;

    #[derive(Config, Serialize, Deserialize, Debug, PartialEq)]
    pub struct TestConfig {
        /// The application host.
        #[config(default = "localhost")]
        pub host: String,

        /// The port number.
        #[config(default = 8080)]
        pub port: u16,

        /// Enable debug mode.
        #[config(default = false)]
        pub debug: bool,

        /// Database settings.
        #[config(nested)]
        pub database: TestDbConfig,
    }

    #[derive(Config, Serialize, Deserialize, Debug, PartialEq)]
    pub struct TestDbConfig {
        /// Connection string URL.
        pub url: Option<String>,

        /// Connection pool size.
        #[config(default = 5)]
        pub pool_size: usize,

        /// Replica hosts.
        #[config(default = ["replica-1", "replica-2"])]
        pub replicas: Vec<String>,
    }

    /// A config with a required field and no default, so loading it from
    /// defaults alone fails.
    #[derive(Config, Serialize, Deserialize, Debug, PartialEq)]
    pub struct RequiredConfig {
        pub token: String,
    }

    // -- Metadata key fixtures ---------------------------------------------------

    pub struct ProjectKey;

    impl MetadataKey for ProjectKey {
        type Value = Option<String>;
        const LABEL: &'static str = "Project";

        fn default_value() -> Self::Value {
            None
        }
    }

    pub struct Count;

    impl MetadataKey for Count {
        type Value = u32;
        const LABEL: &'static str = "Count";

        fn default_value() -> Self::Value {
            0
        }
    }

    #[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum Severity {
        Low,
        High,
    }

    pub struct Priority;

    impl MetadataKey for Priority {
        type Value = Severity;
        const LABEL: &'static str = "Priority";

        fn default_value() -> Self::Value {
            Severity::Low
        }
    }

    /// Counts calls to `Stamp::format`, to observe when display text is built.
    pub static STAMP_FORMAT_CALLS: AtomicUsize = AtomicUsize::new(0);

    pub struct Stamp;

    impl MetadataKey for Stamp {
        type Value = u64;
        const LABEL: &'static str = "Stamp";

        fn default_value() -> Self::Value {
            0
        }

        fn format(value: &Self::Value) -> Option<String> {
            STAMP_FORMAT_CALLS.fetch_add(1, Ordering::SeqCst);
            Some(format!("t+{value}"))
        }
    }

    static TICKS: AtomicUsize = AtomicUsize::new(0);

    /// Formats each write with a fresh tick, so equal values never share
    /// display text.
    pub struct Tick;

    impl MetadataKey for Tick {
        type Value = u64;
        const LABEL: &'static str = "Tick";

        fn default_value() -> Self::Value {
            0
        }

        fn format(value: &Self::Value) -> Option<String> {
            let tick = TICKS.fetch_add(1, Ordering::SeqCst);
            Some(format!("{value} @{tick}"))
        }
    }

    #[test]
    fn test_config_loads_defaults() {
        let config = TestConfig::builder().load().unwrap();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 8080);
        assert!(!config.debug);
        assert_eq!(config.database.url, None);
        assert_eq!(config.database.pool_size, 5);
        assert_eq!(config.database.replicas, vec!["replica-1", "replica-2"]);
    }
}
