// RPC响应校验模块 - 防止钱包/节点返回的数据污染本地状态

use crate::error::ProviderError;

/// 解析 JSON-RPC quantity（0x 前缀十六进制，最多 u64）
pub fn parse_quantity(value: &str) -> Result<u64, ProviderError> {
    let hex = value
        .strip_prefix("0x")
        .ok_or_else(|| ProviderError::InvalidResponse(format!("quantity without 0x: {}", value)))?;

    // u64最多16个十六进制字符
    if hex.is_empty() || hex.len() > 16 {
        return Err(ProviderError::InvalidResponse(format!(
            "quantity has invalid length: {}",
            value
        )));
    }

    u64::from_str_radix(hex, 16)
        .map_err(|_| ProviderError::InvalidResponse(format!("invalid quantity: {}", value)))
}

/// 验证交易哈希格式
pub fn validate_tx_hash(tx_hash: &str) -> Result<String, ProviderError> {
    let hash = tx_hash.trim_start_matches("0x");

    // 32字节 = 64个十六进制字符
    if hash.len() != 64 {
        return Err(ProviderError::InvalidResponse(format!(
            "invalid transaction hash length: expected 64, got {}",
            hash.len()
        )));
    }

    if !hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ProviderError::InvalidResponse(
            "invalid transaction hash format: contains non-hex characters".to_string(),
        ));
    }

    Ok(format!("0x{}", hash.to_lowercase()))
}

/// 验证账户地址格式（钱包返回的地址）
pub fn validate_address(address: &str) -> Result<String, ProviderError> {
    let addr = address.trim_start_matches("0x");

    // 20字节 = 40个十六进制字符
    if addr.len() != 40 || !addr.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ProviderError::InvalidResponse(format!(
            "invalid account address: {}",
            address
        )));
    }

    Ok(format!("0x{}", addr.to_lowercase()))
}

/// 检查 JSON-RPC 响应并取出 result 字段
pub fn rpc_result(json: serde_json::Value) -> Result<serde_json::Value, ProviderError> {
    if let Some(error) = json.get("error") {
        let code = error.get("code").and_then(|c| c.as_i64()).unwrap_or(-1);
        let message = error
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("Unknown error");
        return Err(ProviderError::from_rpc(code, message));
    }

    if let Some(version) = json.get("jsonrpc") {
        if version.as_str() != Some("2.0") {
            return Err(ProviderError::InvalidResponse(format!(
                "unsupported JSON-RPC version: {}",
                version
            )));
        }
    }

    match json {
        serde_json::Value::Object(mut map) => map
            .remove("result")
            .ok_or_else(|| ProviderError::InvalidResponse("missing result field".to_string())),
        _ => Err(ProviderError::InvalidResponse(
            "response is not a JSON object".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("0x4e454152").unwrap(), 1_313_161_554);
        assert_eq!(parse_quantity("0x0").unwrap(), 0);
        assert!(parse_quantity("12").is_err());
        assert!(parse_quantity("0x").is_err());
        assert!(parse_quantity("0x11111111111111111").is_err());
    }

    #[test]
    fn test_validate_tx_hash() {
        let hash = "0x1234567890ABCDEF1234567890abcdef1234567890abcdef1234567890abcdef";
        assert_eq!(validate_tx_hash(hash).unwrap(), hash.to_lowercase());
        assert!(validate_tx_hash("invalid").is_err());
    }

    #[test]
    fn test_validate_address() {
        let addr = "0x742d35Cc6634C0532925a3b844Bc9e7595f0bEb6";
        assert_eq!(
            validate_address(addr).unwrap(),
            "0x742d35cc6634c0532925a3b844bc9e7595f0beb6"
        );
        assert!(validate_address("0x123").is_err());
    }

    #[test]
    fn test_rpc_result() {
        let ok = rpc_result(json!({"jsonrpc": "2.0", "id": 1, "result": "0x1"})).unwrap();
        assert_eq!(ok, json!("0x1"));

        let null = rpc_result(json!({"jsonrpc": "2.0", "id": 1, "result": null})).unwrap();
        assert!(null.is_null());

        let rejected = rpc_result(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": 4001, "message": "User rejected the request."}
        }));
        assert!(matches!(rejected, Err(ProviderError::UserRejected)));

        assert!(rpc_result(json!({"jsonrpc": "2.0", "id": 1})).is_err());
    }
}
