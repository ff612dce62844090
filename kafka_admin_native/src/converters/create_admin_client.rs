use crate::abi::RawKeyValue;
use crate::converters::shared::{c_str_to_string, raw_slice};
use anyhow::Context;
use kafka_admin::models::KeyValue;
use std::ffi::c_int;

/// # Safety
///
/// `kvs` must point to `kv_count` records whose strings are valid for the call.
pub unsafe fn raw_key_values_to_internal(
    kv_count: c_int,
    kvs: *const RawKeyValue,
) -> Result<Vec<KeyValue>, anyhow::Error> {
    let raw_key_values = unsafe { raw_slice(kvs, kv_count, "key values") }?;

    raw_key_values
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let key = unsafe { c_str_to_string(raw.key, "key") }
                .with_context(|| format!("While reading key value #{index}"))?;
            let value = unsafe { c_str_to_string(raw.value, "value") }
                .with_context(|| format!("While reading key value #{index}"))?;
            Ok(KeyValue::new(key, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CString;
    use std::ptr::null;

    #[test]
    fn key_values_are_copied() {
        let key = CString::new("bootstrap.servers").unwrap();
        let value = CString::new("127.0.0.1:19092").unwrap();
        let kvs = [RawKeyValue {
            key: key.as_ptr(),
            value: value.as_ptr(),
        }];

        let key_values =
            unsafe { raw_key_values_to_internal(kvs.len() as c_int, kvs.as_ptr()) }.unwrap();
        drop((key, value));

        assert_eq!(
            key_values,
            vec![KeyValue::new("bootstrap.servers", "127.0.0.1:19092")]
        );
    }

    #[test]
    fn null_value_is_rejected() {
        let key = CString::new("bootstrap.servers").unwrap();
        let kvs = [RawKeyValue {
            key: key.as_ptr(),
            value: null(),
        }];

        let error = unsafe { raw_key_values_to_internal(1, kvs.as_ptr()) }.unwrap_err();

        assert_eq!(
            format!("{error:#}"),
            "While reading key value #0: value can't be null"
        );
    }

    #[test]
    fn empty_input_is_empty() {
        let key_values = unsafe { raw_key_values_to_internal(0, null()) }.unwrap();

        assert!(key_values.is_empty());
    }
}
