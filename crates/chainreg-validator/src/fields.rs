//! # Field Validation
//!
//! Turns a [`RawEntry`] into a typed [`ChainEntry`], checking required fields
//! in a fixed order and failing on the first violation:
//!
//! 1. `chainId`, `chainName`
//! 2. `stakeCurrency`
//! 3. `bip44.coinType`
//! 4. `bech32Config` and its six prefixes
//! 5. `currencies`, `feeCurrencies`
//! 6. `rpc`, `rest`
//! 7. `features` (optional)
//!
//! Absent, `null`, `false`, `0` and `""` all count as missing. A numeric field
//! accepts a JSON number or a numeric string, as long as it is non-zero.
//!
//! No network access happens here, so an entry with a structural defect never
//! reaches the endpoint stage.

use serde_json::{Map, Value};

use chainreg_core::{Bech32Config, Bip44, ChainEntry, CurrencyDescriptor, RawEntry, ValidationError};

const NON_EMPTY_STRING: &str = "a non-empty string";
const NON_ZERO_NUMBER: &str = "a non-zero number";
const POSITIVE_INTEGER: &str = "a positive integer";
const CURRENCY_OBJECT: &str = "an object with coinDenom, coinMinimalDenom and coinDecimals";
const CURRENCY_LIST: &str = "a non-empty array of currencies";
const STRING_LIST: &str = "an array of strings";

/// Validate every required field of `raw` and build the typed entry.
///
/// # Errors
///
/// Returns [`ValidationError::MissingField`] or
/// [`ValidationError::InvalidFieldType`] for the first rule violated.
pub fn validate_fields(raw: &RawEntry) -> Result<ChainEntry, ValidationError> {
    let context = raw.describe();
    let root = raw
        .content
        .as_object()
        .ok_or_else(|| ValidationError::InvalidFieldType {
            field: "entry".to_string(),
            expected: "a JSON object",
            context: context.clone(),
        })?;

    let chain_id = required_string(root, "chainId", "chainId", &context)?;
    let chain_name = required_string(root, "chainName", "chainName", &context)?;

    let stake_currency = match root.get("stakeCurrency") {
        Some(value) if !is_absent(value) => currency(value, "stakeCurrency")?,
        _ => return Err(missing("stakeCurrency", &context)),
    };

    let bip44 = validate_bip44(root, &context)?;
    let bech32_config = validate_bech32_config(root, &context)?;

    let currencies = currency_list(root, "currencies", &context)?;
    let fee_currencies = currency_list(root, "feeCurrencies", &context)?;

    let rpc = required_string(root, "rpc", "rpc", &context)?;
    let rest = required_string(root, "rest", "rest", &context)?;

    let features = optional_string_list(root, "features", &context)?;

    Ok(ChainEntry {
        chain_id,
        chain_name,
        stake_currency,
        bip44,
        bech32_config,
        currencies,
        fee_currencies,
        rpc,
        rest,
        features,
        file_name: raw.file_name.clone(),
    })
}

fn validate_bip44(root: &Map<String, Value>, context: &str) -> Result<Bip44, ValidationError> {
    let bip44 = root.get("bip44");
    let coin_type = bip44.and_then(|b| b.get("coinType"));
    match coin_type {
        Some(value) if !is_absent(value) => {
            let bip44_context = bip44.map(Value::to_string).unwrap_or_default();
            let coin_type = positive_integer(value, "bip44.coinType", &bip44_context)?;
            Ok(Bip44 { coin_type })
        }
        _ => Err(missing("bip44.coinType", context)),
    }
}

fn validate_bech32_config(
    root: &Map<String, Value>,
    context: &str,
) -> Result<Bech32Config, ValidationError> {
    let config = match root.get("bech32Config") {
        Some(value) if !is_absent(value) => value,
        _ => return Err(missing("bech32Config", context)),
    };

    let prefix = |key: &str| -> Result<String, ValidationError> {
        let field = format!("bech32Config.{key}");
        match config.get(key) {
            Some(value) if !is_absent(value) => string_value(value, &field, context),
            _ => Err(missing(&field, context)),
        }
    };

    Ok(Bech32Config {
        bech32_prefix_acc_addr: prefix("bech32PrefixAccAddr")?,
        bech32_prefix_acc_pub: prefix("bech32PrefixAccPub")?,
        bech32_prefix_val_addr: prefix("bech32PrefixValAddr")?,
        bech32_prefix_val_pub: prefix("bech32PrefixValPub")?,
        bech32_prefix_cons_addr: prefix("bech32PrefixConsAddr")?,
        bech32_prefix_cons_pub: prefix("bech32PrefixConsPub")?,
    })
}

fn currency_list(
    root: &Map<String, Value>,
    key: &str,
    context: &str,
) -> Result<Vec<CurrencyDescriptor>, ValidationError> {
    let items = match root.get(key) {
        Some(Value::Array(items)) if !items.is_empty() => items,
        Some(Value::Array(_)) => return Err(missing(key, context)),
        Some(value) if !is_absent(value) => {
            return Err(invalid(key, CURRENCY_LIST, context));
        }
        _ => return Err(missing(key, context)),
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| currency(item, &format!("{key}[{i}]")))
        .collect()
}

/// Validate one currency descriptor. Diagnostics echo the descriptor itself.
fn currency(value: &Value, path: &str) -> Result<CurrencyDescriptor, ValidationError> {
    let context = value.to_string();
    let obj = value
        .as_object()
        .ok_or_else(|| invalid(path, CURRENCY_OBJECT, &context))?;

    let coin_denom = required_string(obj, "coinDenom", &format!("{path}.coinDenom"), &context)?;
    let coin_minimal_denom = required_string(
        obj,
        "coinMinimalDenom",
        &format!("{path}.coinMinimalDenom"),
        &context,
    )?;

    let decimals_path = format!("{path}.coinDecimals");
    let coin_decimals = match obj.get("coinDecimals") {
        Some(value) if !is_absent(value) => positive_integer(value, &decimals_path, &context)?,
        _ => return Err(missing(&decimals_path, &context)),
    };

    Ok(CurrencyDescriptor {
        coin_denom,
        coin_minimal_denom,
        coin_decimals,
    })
}

fn optional_string_list(
    root: &Map<String, Value>,
    key: &str,
    context: &str,
) -> Result<Option<Vec<String>>, ValidationError> {
    match root.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| invalid(key, STRING_LIST, context))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(_) => Err(invalid(key, STRING_LIST, context)),
    }
}

fn required_string(
    obj: &Map<String, Value>,
    key: &str,
    field: &str,
    context: &str,
) -> Result<String, ValidationError> {
    match obj.get(key) {
        Some(value) if !is_absent(value) => string_value(value, field, context),
        _ => Err(missing(field, context)),
    }
}

fn string_value(value: &Value, field: &str, context: &str) -> Result<String, ValidationError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| invalid(field, NON_EMPTY_STRING, context))
}

/// Interpret `value` as a number the way a loosely-typed registry file means
/// it: JSON numbers and numeric strings are accepted, zero is not.
fn non_zero_number(value: &Value, field: &str, context: &str) -> Result<f64, ValidationError> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match number {
        Some(n) if n.is_finite() && n != 0.0 => Ok(n),
        _ => Err(invalid(field, NON_ZERO_NUMBER, context)),
    }
}

fn positive_integer(value: &Value, field: &str, context: &str) -> Result<u32, ValidationError> {
    let n = non_zero_number(value, field, context)?;
    if n < 0.0 || n.fract() != 0.0 || n > f64::from(u32::MAX) {
        return Err(invalid(field, POSITIVE_INTEGER, context));
    }
    Ok(n as u32)
}

/// Values the registry treats as "not provided".
fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

fn missing(field: &str, context: &str) -> ValidationError {
    ValidationError::MissingField {
        field: field.to_string(),
        context: context.to_string(),
    }
}

fn invalid(field: &str, expected: &'static str, context: &str) -> ValidationError {
    ValidationError::InvalidFieldType {
        field: field.to_string(),
        expected,
        context: context.to_string(),
    }
}
