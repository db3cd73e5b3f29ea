//! Response normalization.
//!
//! The daemon's JSON is not uniform. Some endpoints report success in-band
//! through a `status` string, some leak serializer artifacts such as dotted
//! key names or a stray `""` key, and block payloads arrive as arrays of byte
//! values. Each operation in the catalog names one [`Rule`] that absorbs those
//! quirks so callers see a fixed shape.
//!
//! Rules are pure: they take the raw value and either return the normalized
//! value or a [`NormalizeError`]. They never perform I/O.

use serde_json::{Map, Value};

use crate::error::NormalizeError;

pub type Reshape = fn(Value) -> Result<Value, NormalizeError>;

/// How one operation's raw result becomes its normalized result.
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Return only the named member of the result object.
    Field(&'static str),
    /// Check the in-band status, then return an object holding exactly these keys.
    Status(&'static [&'static str]),
    /// Check the in-band status, then return the value of one key.
    StatusField(&'static str),
    /// Check the in-band status and return `null`.
    StatusOnly,
    /// Endpoint-specific reshaping.
    Custom(Reshape),
    /// Endpoint-specific reshaping of a status-checked response. The reshaper
    /// performs the status check itself.
    StatusCustom(Reshape),
}

impl Rule {
    pub fn apply(&self, raw: Value) -> Result<Value, NormalizeError> {
        match *self {
            Self::Field(key) => {
                let mut object = into_object(raw, "result")?;
                take_key(&mut object, key)
            }
            Self::Status(keys) => {
                let object = into_checked_object(raw)?;
                pick_keys(object, keys).map(Value::Object)
            }
            Self::StatusField(key) => {
                let mut object = into_checked_object(raw)?;
                take_key(&mut object, key)
            }
            Self::StatusOnly => {
                into_checked_object(raw)?;
                Ok(Value::Null)
            }
            Self::Custom(reshape) | Self::StatusCustom(reshape) => reshape(raw),
        }
    }

    /// Whether the response carries an in-band `status` this rule verifies.
    pub fn checks_status(&self) -> bool {
        match self {
            Self::Field(_) | Self::Custom(_) => false,
            Self::Status(_) | Self::StatusField(_) | Self::StatusOnly | Self::StatusCustom(_) => {
                true
            }
        }
    }
}

// ==============================================================================
// Building Blocks
// ==============================================================================

/// Verify `status` equals `ok`, ignoring ASCII case.
pub fn check_status(object: &Map<String, Value>) -> Result<(), NormalizeError> {
    match object.get("status") {
        None | Some(Value::Null) => Err(NormalizeError::MissingStatus),
        Some(Value::String(status)) if status.eq_ignore_ascii_case("ok") => Ok(()),
        Some(Value::String(status)) => Err(NormalizeError::StatusNotOk {
            status: status.clone(),
        }),
        Some(other) => Err(NormalizeError::StatusNotOk {
            status: other.to_string(),
        }),
    }
}

fn into_object(value: Value, key: &str) -> Result<Map<String, Value>, NormalizeError> {
    match value {
        Value::Object(object) => Ok(object),
        _ => Err(NormalizeError::UnexpectedType {
            key: key.to_owned(),
            expected: "an object",
        }),
    }
}

fn into_array(value: Value, key: &str) -> Result<Vec<Value>, NormalizeError> {
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(NormalizeError::UnexpectedType {
            key: key.to_owned(),
            expected: "an array",
        }),
    }
}

fn into_checked_object(raw: Value) -> Result<Map<String, Value>, NormalizeError> {
    // A bare string or null carries no status at all.
    let Value::Object(object) = raw else {
        return Err(NormalizeError::MissingStatus);
    };
    check_status(&object)?;
    Ok(object)
}

fn take_key(object: &mut Map<String, Value>, key: &str) -> Result<Value, NormalizeError> {
    object
        .remove(key)
        .ok_or_else(|| NormalizeError::MissingKey { key: key.to_owned() })
}

fn pick_keys(
    mut object: Map<String, Value>,
    keys: &[&str],
) -> Result<Map<String, Value>, NormalizeError> {
    let mut picked = Map::with_capacity(keys.len());
    for key in keys {
        picked.insert((*key).to_owned(), take_key(&mut object, key)?);
    }
    Ok(picked)
}

/// Move each `(from, to)` key of `object` into a fresh object under its plain
/// name. Keys not listed are dropped, so the output shape is fixed.
///
/// Some daemon builds already emit the plain name; that spelling is accepted
/// as well.
pub fn rewrite_keys(
    mut object: Map<String, Value>,
    renames: &[(&str, &str)],
) -> Result<Map<String, Value>, NormalizeError> {
    let mut rewritten = Map::with_capacity(renames.len());
    for (from, to) in renames {
        let value = match object.remove(*from) {
            Some(value) => value,
            None => take_key(&mut object, to).map_err(|_| NormalizeError::MissingKey {
                key: (*from).to_owned(),
            })?,
        };
        rewritten.insert((*to).to_owned(), value);
    }
    Ok(rewritten)
}

/// Encode an array of byte values as lowercase hex. A string must already be
/// valid hex and is only lowercased.
pub fn bytes_to_hex(value: Value, key: &str) -> Result<String, NormalizeError> {
    if let Value::String(s) = value {
        if hex::decode(&s).is_err() {
            return Err(NormalizeError::UnexpectedType {
                key: key.to_owned(),
                expected: "a byte array or hex string",
            });
        }
        return Ok(s.to_ascii_lowercase());
    }
    let items = into_array(value, key)?;
    let bytes = items
        .iter()
        .map(|item| {
            item.as_u64()
                .and_then(|n| u8::try_from(n).ok())
                .ok_or_else(|| NormalizeError::InvalidByte {
                    key: key.to_owned(),
                    value: item.to_string(),
                })
        })
        .collect::<Result<Vec<u8>, _>>()?;
    Ok(hex::encode(bytes))
}

/// Remove the empty-string key some daemon serializers emit.
pub fn strip_empty_key(object: &mut Map<String, Value>) {
    object.remove("");
}

/// Rewrite every entry of a wrapped-record array, one output record per input
/// entry.
pub fn reshape_records(
    value: Value,
    key: &str,
    renames: &[(&str, &str)],
) -> Result<Vec<Value>, NormalizeError> {
    into_array(value, key)?
        .into_iter()
        .map(|entry| {
            let object = into_object(entry, key)?;
            rewrite_keys(object, renames).map(Value::Object)
        })
        .collect()
}

// ==============================================================================
// Endpoint Reshapers
// ==============================================================================

const TX_PREFIX_KEYS: &[(&str, &str)] = &[
    ("transactionPrefixInfo.txHash", "hash"),
    ("transactionPrefixInfo.txPrefix", "prefix"),
];

/// `f_transaction_json`: drop the spurious `""` member of `tx` and return
/// `{block, tx, txDetails}`.
pub fn transaction(raw: Value) -> Result<Value, NormalizeError> {
    let object = into_object(raw, "result")?;
    let mut picked = pick_keys(object, &["block", "tx", "txDetails"])?;
    if let Some(Value::Object(tx)) = picked.get_mut("tx") {
        strip_empty_key(tx);
    }
    Ok(Value::Object(picked))
}

/// `/info`: status-checked; everything except `status` (and any `""` key) is
/// passed through.
pub fn node_info(raw: Value) -> Result<Value, NormalizeError> {
    let mut object = into_checked_object(raw)?;
    object.remove("status");
    strip_empty_key(&mut object);
    Ok(Value::Object(object))
}

/// `/get_global_indexes_for_range`: `[{key, value}]` becomes `[{hash, indexes}]`.
pub fn global_indexes_for_range(raw: Value) -> Result<Value, NormalizeError> {
    let mut object = into_checked_object(raw)?;
    let indexes = take_key(&mut object, "indexes")?;
    let records = reshape_records(indexes, "indexes", &[("key", "hash"), ("value", "indexes")])?;
    Ok(Value::Array(records))
}

/// `/queryblockslite`: dotted `blockShortInfo.*` names become plain names, the
/// block payload becomes hex, and each transaction prefix becomes `{hash, prefix}`.
pub fn blocks_lite(raw: Value) -> Result<Value, NormalizeError> {
    let object = into_checked_object(raw)?;
    let mut picked = pick_keys(object, &["currentHeight", "fullOffset", "items"])?;
    let items = take_key(&mut picked, "items")?;

    let items = into_array(items, "items")?
        .into_iter()
        .map(lite_block)
        .collect::<Result<Vec<_>, _>>()?;
    picked.insert("items".to_owned(), Value::Array(items));
    Ok(Value::Object(picked))
}

fn lite_block(item: Value) -> Result<Value, NormalizeError> {
    let object = into_object(item, "items")?;
    let mut block = rewrite_keys(
        object,
        &[
            ("blockShortInfo.block", "block"),
            ("blockShortInfo.blockId", "hash"),
            ("blockShortInfo.txPrefixes", "transactions"),
        ],
    )?;

    let payload = take_key(&mut block, "block")?;
    block.insert(
        "block".to_owned(),
        Value::String(bytes_to_hex(payload, "blockShortInfo.block")?),
    );

    let prefixes = take_key(&mut block, "transactions")?;
    let transactions = reshape_records(prefixes, "blockShortInfo.txPrefixes", TX_PREFIX_KEYS)?;
    block.insert("transactions".to_owned(), Value::Array(transactions));
    Ok(Value::Object(block))
}

/// `/get_pool_changes_lite`: returns `{added, deleted, tailBlockCurrent}`.
pub fn pool_changes(raw: Value) -> Result<Value, NormalizeError> {
    let object = into_checked_object(raw)?;
    let mut changes = rewrite_keys(
        object,
        &[
            ("addedTxs", "added"),
            ("deletedTxsIds", "deleted"),
            ("isTailBlockActual", "tailBlockCurrent"),
        ],
    )?;
    let added = take_key(&mut changes, "added")?;
    let added = reshape_records(added, "addedTxs", TX_PREFIX_KEYS)?;
    changes.insert("added".to_owned(), Value::Array(added));
    Ok(Value::Object(changes))
}
