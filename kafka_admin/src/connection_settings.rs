use crate::models::KeyValue;
use anyhow::bail;
use rdkafka::ClientConfig;
use std::collections::BTreeMap;

pub const BOOTSTRAP_SERVERS: &str = "bootstrap.servers";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    properties: BTreeMap<String, String>,
}

impl ConnectionSettings {
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn bootstrap_servers(&self) -> &str {
        self.properties
            .get(BOOTSTRAP_SERVERS)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

impl TryFrom<Vec<KeyValue>> for ConnectionSettings {
    type Error = anyhow::Error;

    fn try_from(value: Vec<KeyValue>) -> Result<Self, Self::Error> {
        // Later pairs win
        let properties = value
            .iter()
            .map(|pair| (pair.key().clone(), pair.value().clone()))
            .collect::<BTreeMap<_, _>>();

        match properties.get(BOOTSTRAP_SERVERS) {
            Some(brokers) if !brokers.trim().is_empty() => {}
            _ => bail!("No brokers specified"),
        }

        Ok(Self { properties })
    }
}

impl TryFrom<&ConnectionSettings> for ClientConfig {
    type Error = anyhow::Error;

    fn try_from(value: &ConnectionSettings) -> Result<Self, Self::Error> {
        if value.bootstrap_servers().trim().is_empty() {
            bail!("No brokers specified")
        }

        let mut config = ClientConfig::new();
        for (key, property) in value.properties() {
            config.set(key, property);
        }

        if let Ok(value) = std::env::var("RD_KAFKA_DEBUG") {
            config.set("debug", value);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_bootstrap_servers_is_rejected() {
        assert!(ConnectionSettings::try_from(vec![]).is_err());

        let misspelled = vec![KeyValue::new("bootstrap.servers_XXX", "")];
        assert!(ConnectionSettings::try_from(misspelled).is_err());

        let blank = vec![KeyValue::new(BOOTSTRAP_SERVERS, "  ")];
        assert!(ConnectionSettings::try_from(blank).is_err());
    }

    #[test]
    fn later_pairs_override_earlier_ones() {
        let settings = ConnectionSettings::try_from(vec![
            KeyValue::new(BOOTSTRAP_SERVERS, "127.0.0.1:9092"),
            KeyValue::new("client.id", "first"),
            KeyValue::new("client.id", "second"),
        ])
        .unwrap();

        assert_eq!(settings.bootstrap_servers(), "127.0.0.1:9092");
        assert_eq!(settings.properties()["client.id"], "second");
        assert_eq!(settings.properties().len(), 2);
    }

    #[test]
    fn every_property_lands_in_client_config() {
        let settings = ConnectionSettings::try_from(vec![
            KeyValue::new(BOOTSTRAP_SERVERS, "127.0.0.1:19092,127.0.0.1:29092"),
            KeyValue::new("request.timeout.ms", "5000"),
        ])
        .unwrap();

        let config = ClientConfig::try_from(&settings).unwrap();

        assert_eq!(
            config.get(BOOTSTRAP_SERVERS),
            Some("127.0.0.1:19092,127.0.0.1:29092")
        );
        assert_eq!(config.get("request.timeout.ms"), Some("5000"));
    }
}
