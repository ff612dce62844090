use getset::Getters;

#[derive(Debug, Clone, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct KeyValue {
    key: String,
    value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_is_readable_through_getters() {
        let pair = KeyValue::new("bootstrap.servers", "127.0.0.1:19092");

        assert_eq!(pair.key(), "bootstrap.servers");
        assert_eq!(pair.value(), "127.0.0.1:19092");
    }
}
