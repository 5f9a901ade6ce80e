//! Action dispatch for the `POST /` gateway (SPEC_FULL.md §6).
//!
//! Each handler mirrors its counterpart in
//! `original_source/server/pippin_server.py`: validate required fields,
//! look up the wallet, perform the operation, map any error through
//! [`wire_message`]. Field-specific "Invalid X" messages are produced
//! here rather than via `wire_message`, since the same underlying parse
//! failure reports a different string depending on which field it came
//! from (`source` vs `destination`, `account` vs `representative`, ...).

use serde_json::{json, Value};

use crate::error::Error;
use crate::keys::{SecretKey, Seed};
use crate::server::wire::wire_message;
use crate::server::AppState;
use crate::types::{Account, BlockHash, Raw, Work};

/// Actions recognized but deliberately unimplemented — returned before
/// ever reaching the proxy path.
const NOT_IMPLEMENTED: &[&str] = &[
    "account_move",
    "account_remove",
    "receive_minimum",
    "receive_minimum_set",
    "search_pending",
    "search_pending_all",
    "wallet_add_watch",
    "wallet_balances",
    "wallet_change_seed",
    "wallet_contains",
    "wallet_destroy",
    "wallet_export",
    "wallet_frontiers",
    "wallet_history",
    "wallet_info",
    "wallet_ledger",
    "wallet_pending",
    "wallet_representative",
    "wallet_republish",
    "wallet_work_get",
    "work_get",
    "work_set",
];

fn parse_error() -> Value {
    json!({"error": "Unable to parse json"})
}

fn error(message: &str) -> Value {
    json!({"error": message})
}

fn str_field<'a>(body: &'a Value, name: &str) -> Option<&'a str> {
    body.get(name).and_then(Value::as_str)
}

fn parse_raw(value: &Value) -> Option<Raw> {
    match value {
        Value::String(s) => s.parse::<Raw>().ok(),
        Value::Number(n) => n.as_u64().map(|v| Raw::new(v as u128)),
        _ => None,
    }
}

fn parse_work(body: &Value) -> Result<Option<Work>, Value> {
    match str_field(body, "work") {
        Some(w) => Work::from_hex(w).map(Some).map_err(|_| parse_error()),
        None => Ok(None),
    }
}

/// Top-level dispatch: `action` has already been lowercased and
/// trimmed by the caller.
pub async fn dispatch(state: &AppState, action: &str, body: &Value) -> Value {
    match action {
        "wallet_create" => wallet_create(state, body).await,
        "account_create" => account_create(state, body).await,
        "accounts_create" => accounts_create(state, body).await,
        "account_list" => account_list(state, body).await,
        "receive" => receive(state, body).await,
        "send" => send(state, body).await,
        "account_representative_set" => account_representative_set(state, body).await,
        "password_change" => password_change(state, body).await,
        "password_enter" => password_enter(state, body).await,
        "password_valid" => password_valid(state, body).await,
        "wallet_representative_set" => wallet_representative_set(state, body).await,
        "wallet_add" => wallet_add(state, body).await,
        "wallet_lock" => wallet_lock(state, body).await,
        "wallet_locked" => wallet_locked(state, body).await,
        _ if NOT_IMPLEMENTED.contains(&action) => error("not_implemented"),
        _ => proxy(state, body).await,
    }
}

async fn proxy(state: &AppState, body: &Value) -> Value {
    match state.rpc.make_request(body.clone()).await {
        Ok(response) => response,
        Err(e) => error(wire_message(&e)),
    }
}

async fn wallet_create(state: &AppState, body: &Value) -> Value {
    let seed = match str_field(body, "seed") {
        Some(s) => {
            if Seed::from_hex(s).is_err() {
                return error("Invalid seed");
            }
            Some(s)
        }
        None => None,
    };

    match state.wallet_store.create(seed).await {
        Ok(wallet) => json!({"wallet": wallet}),
        Err(e) => error(wire_message(&e)),
    }
}

async fn account_create(state: &AppState, body: &Value) -> Value {
    let Some(wallet) = str_field(body, "wallet") else {
        return parse_error();
    };

    match state.wallet_store.account_create(wallet).await {
        Ok(account) => json!({"account": account.as_str()}),
        Err(e) => error(wire_message(&e)),
    }
}

async fn accounts_create(state: &AppState, body: &Value) -> Value {
    let Some(wallet) = str_field(body, "wallet") else {
        return parse_error();
    };
    let Some(count) = body.get("count").and_then(Value::as_u64) else {
        return parse_error();
    };
    let Ok(count) = u32::try_from(count) else {
        return parse_error();
    };

    match state.wallet_store.accounts_create(wallet, count).await {
        Ok(accounts) => {
            let addresses: Vec<&str> = accounts.iter().map(Account::as_str).collect();
            json!({"accounts": addresses})
        }
        Err(e) => error(wire_message(&e)),
    }
}

async fn account_list(state: &AppState, body: &Value) -> Value {
    let Some(wallet) = str_field(body, "wallet") else {
        return parse_error();
    };
    // The original reads a `count` field; a request keyed with its
    // `acount` typo is simply unmatched and falls back to the default.
    let count = body
        .get("count")
        .and_then(Value::as_u64)
        .and_then(|c| u32::try_from(c).ok())
        .unwrap_or(1000);

    match state.wallet_store.account_list(wallet, count).await {
        Ok(accounts) => {
            let addresses: Vec<&str> = accounts.iter().map(Account::as_str).collect();
            json!({"accounts": addresses})
        }
        Err(e) => error(wire_message(&e)),
    }
}

async fn receive(state: &AppState, body: &Value) -> Value {
    let (Some(wallet), Some(account_str), Some(block_str)) = (
        str_field(body, "wallet"),
        str_field(body, "account"),
        str_field(body, "block"),
    ) else {
        return parse_error();
    };

    let Ok(account) = account_str.parse::<Account>() else {
        return error("Invalid address");
    };
    let Ok(source_hash) = BlockHash::from_hex(block_str) else {
        return error("Invalid block");
    };
    let work = match parse_work(body) {
        Ok(w) => w,
        Err(e) => return e,
    };

    match state
        .pipeline
        .receive(wallet, &account, &source_hash, work)
        .await
    {
        Ok(hash) => json!({"block": hash.to_hex()}),
        Err(e) => error(wire_message(&e)),
    }
}

async fn send(state: &AppState, body: &Value) -> Value {
    let (Some(wallet), Some(source_str), Some(dest_str), Some(amount_value)) = (
        str_field(body, "wallet"),
        str_field(body, "source"),
        str_field(body, "destination"),
        body.get("amount"),
    ) else {
        return parse_error();
    };

    let Ok(source) = source_str.parse::<Account>() else {
        return error("Invalid source");
    };
    let Ok(destination) = dest_str.parse::<Account>() else {
        return error("Invalid destination");
    };
    let Some(amount) = parse_raw(amount_value) else {
        return parse_error();
    };
    let id = str_field(body, "id");
    let work = match parse_work(body) {
        Ok(w) => w,
        Err(e) => return e,
    };

    match state
        .pipeline
        .send(wallet, &source, &destination, amount, id, work)
        .await
    {
        Ok(hash) => json!({"block": hash.to_hex()}),
        Err(e) => error(wire_message(&e)),
    }
}

async fn account_representative_set(state: &AppState, body: &Value) -> Value {
    let (Some(wallet), Some(account_str), Some(representative_str)) = (
        str_field(body, "wallet"),
        str_field(body, "account"),
        str_field(body, "representative"),
    ) else {
        return parse_error();
    };

    let Ok(account) = account_str.parse::<Account>() else {
        return error("Invalid account");
    };
    let Ok(representative) = representative_str.parse::<Account>() else {
        return error("Invalid representative");
    };
    let work = match parse_work(body) {
        Ok(w) => w,
        Err(e) => return e,
    };

    match state
        .pipeline
        .representative_set(wallet, &account, &representative, work)
        .await
    {
        Ok(hash) => json!({"block": hash.to_hex()}),
        Err(e) => error(wire_message(&e)),
    }
}

async fn password_change(state: &AppState, body: &Value) -> Value {
    let (Some(wallet), Some(password)) =
        (str_field(body, "wallet"), str_field(body, "password"))
    else {
        return parse_error();
    };

    match state.wallet_store.encrypt_wallet(wallet, password).await {
        Ok(()) => json!({"changed": "1"}),
        Err(e) => error(wire_message(&e)),
    }
}

async fn password_enter(state: &AppState, body: &Value) -> Value {
    let (Some(wallet), Some(password)) =
        (str_field(body, "wallet"), str_field(body, "password"))
    else {
        return parse_error();
    };

    match state.wallet_store.unlock(wallet, password).await {
        Ok(()) => json!({"valid": "1"}),
        Err(Error::DecryptionError) => json!({"valid": "0"}),
        Err(e) => error(wire_message(&e)),
    }
}

async fn password_valid(state: &AppState, body: &Value) -> Value {
    let (Some(wallet), Some(password)) =
        (str_field(body, "wallet"), str_field(body, "password"))
    else {
        return parse_error();
    };

    match state.wallet_store.check_password(wallet, password).await {
        Ok(valid) => json!({"valid": if valid { "1" } else { "0" }}),
        Err(e) => error(wire_message(&e)),
    }
}

async fn wallet_representative_set(state: &AppState, body: &Value) -> Value {
    let Some(wallet) = str_field(body, "wallet") else {
        return parse_error();
    };
    let Some(representative_str) = str_field(body, "representative") else {
        return parse_error();
    };
    if let Some(flag) = body.get("update_existing_accounts") {
        if !flag.is_boolean() {
            return parse_error();
        }
    }
    let Ok(representative) = representative_str.parse::<Account>() else {
        return error("Invalid address");
    };
    let update_existing = body
        .get("update_existing_accounts")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if let Err(e) = state
        .wallet_store
        .set_representative(wallet, &representative)
        .await
    {
        return error(wire_message(&e));
    }

    if update_existing {
        let previous = match state
            .wallet_store
            .bulk_representative_update(wallet, &representative)
            .await
        {
            Ok(rows) => rows,
            Err(e) => return error(wire_message(&e)),
        };
        for row in previous {
            if row.representative.as_deref() == Some(representative.as_str()) {
                continue;
            }
            if let Ok(account) = row.address.parse::<Account>() {
                let _ = state
                    .pipeline
                    .representative_set(wallet, &account, &representative, None)
                    .await;
            }
        }
    }

    json!({"set": "1"})
}

async fn wallet_add(state: &AppState, body: &Value) -> Value {
    let (Some(wallet), Some(key_str)) = (str_field(body, "wallet"), str_field(body, "key"))
    else {
        return parse_error();
    };

    let Ok(secret) = SecretKey::from_hex(key_str) else {
        return error("Invalid key");
    };

    match state
        .wallet_store
        .adhoc_account_create(wallet, *secret.as_bytes())
        .await
    {
        Ok(account) => json!({"account": account.as_str()}),
        Err(e) => error(wire_message(&e)),
    }
}

async fn wallet_lock(state: &AppState, body: &Value) -> Value {
    let Some(wallet) = str_field(body, "wallet") else {
        return parse_error();
    };

    if let Err(e) = state.wallet_store.get_wallet_row(wallet).await {
        return error(wire_message(&e));
    }
    state.wallet_store.lock(wallet).await;
    json!({"locked": "1"})
}

async fn wallet_locked(state: &AppState, body: &Value) -> Value {
    let Some(wallet) = str_field(body, "wallet") else {
        return parse_error();
    };

    match state.wallet_store.is_locked(wallet).await {
        Ok(true) => json!({"locked": "1"}),
        Ok(false) => json!({"locked": "0"}),
        Err(e) => error(wire_message(&e)),
    }
}
