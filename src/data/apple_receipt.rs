use base64::{prelude::BASE64_STANDARD, Engine as _};

use crate::{
    data::document::Document,
    errors::{ReceiptDecodeFailure, Result},
};

/// Decodes a base64 App Store receipt blob into a document.
///
/// The decoded text is an old-style property list (`"key" = "value";`),
/// which is rewritten into JSON before parsing. Values that are themselves
/// base64 blobs (e.g. `purchase-info`) are left encoded; decode them with
/// another call.
pub(crate) fn decode_apple_receipt(blob: &str) -> Result<Document> {
    let compact: String = blob.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if compact.is_empty() {
        return Err(ReceiptDecodeFailure::new("receipt blob is empty"));
    }
    let decoded = BASE64_STANDARD
        .decode(compact)
        .map_err(|e| ReceiptDecodeFailure::with_debug("failed to base64-decode receipt", &e))?;
    let text = String::from_utf8(decoded)
        .map_err(|e| ReceiptDecodeFailure::with_debug("receipt is not valid UTF-8", &e))?;
    Document::parse(&plist_to_json(&text)).map_err(|e| {
        ReceiptDecodeFailure::with_debug("failed to parse rewritten receipt", &e)
    })
}

/// Reads `purchase-info` from a receipt blob and returns the
/// `original-transaction-id` it carries.
pub(crate) fn original_transaction_id(receipt_blob: &str) -> Result<String> {
    let receipt = decode_apple_receipt(receipt_blob)?;
    let purchase_info = receipt
        .find_string("purchase-info")
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ReceiptDecodeFailure::new("receipt has no purchase-info"))?;
    decode_apple_receipt(&purchase_info)?
        .find_string("original-transaction-id")
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ReceiptDecodeFailure::new("purchase-info has no original-transaction-id"))
}

/// Rewrites property-list text into JSON: ` = ` becomes `:` and `;` becomes
/// `,`, a missing outer brace pair is added, unquoted keys are quoted and
/// commas left dangling before a closing brace are dropped.
pub(crate) fn plist_to_json(text: &str) -> String {
    let rewritten = text.replace(" = ", ":").replace(';', ",");
    let body = rewritten.trim();
    if body.starts_with('{') {
        repair_object_syntax(body)
    } else {
        repair_object_syntax(&format!("{{{body}}}"))
    }
}

fn repair_object_syntax(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 16);
    let mut containers: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    let mut expect_key = false;

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            i += 1;
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                expect_key = false;
                out.push(c);
            }
            '{' | '[' => {
                containers.push(c);
                expect_key = c == '{';
                out.push(c);
            }
            '}' | ']' => {
                containers.pop();
                expect_key = false;
                out.push(c);
            }
            ',' => {
                let next = chars[i + 1..].iter().copied().find(|c| !c.is_whitespace());
                if matches!(next, Some('}') | None) {
                    i += 1;
                    continue;
                }
                expect_key = containers.last() == Some(&'{');
                out.push(c);
            }
            c if c.is_whitespace() => out.push(c),
            _ if expect_key => {
                let end = chars[i..]
                    .iter()
                    .position(|&c| c == ':')
                    .map_or(chars.len(), |p| i + p);
                let key: String = chars[i..end].iter().collect();
                out.push('"');
                out.push_str(key.trim_end());
                out.push('"');
                expect_key = false;
                i = end;
                continue;
            }
            _ => out.push(c),
        }
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::errors::IapNormalizerError;

    fn encode(text: &str) -> String {
        BASE64_STANDARD.encode(text)
    }

    #[test]
    fn bare_key_pairs_become_json() {
        let blob = encode("purchase-info = \"abc\"; extra = \"x\";");
        let decoded = decode_apple_receipt(&blob).unwrap();
        let expected = Document::parse(r#"{"purchase-info":"abc","extra":"x"}"#).unwrap();
        assert_eq!(decoded, expected);
    }

    #[test]
    fn quoted_plist_with_braces() {
        let text = "{\n\t\"signature\" = \"AbC=\";\n\t\"pod\" = \"17\";\n\t\"signing-status\" = \"0\";\n}";
        let decoded = decode_apple_receipt(&encode(text)).unwrap();
        assert_eq!(decoded.get_string("signature"), "AbC=");
        assert_eq!(decoded.get_int("pod"), 17);
        assert_eq!(decoded.len(), 3);
    }

    #[test]
    fn nested_dictionaries_lose_all_dangling_commas() {
        let json = plist_to_json("{ outer = { inner = 1; }; tail = \"t\"; }");
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, json!({"outer": {"inner": 1}, "tail": "t"}));
    }

    #[test]
    fn separators_inside_strings_are_not_keys() {
        let json = plist_to_json("{ \"note\" = \"a, b: c\"; }");
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, json!({"note": "a, b: c"}));
    }

    #[test]
    fn empty_and_invalid_blobs_fail() {
        for blob in ["", "   ", "***not base64***"] {
            let err = decode_apple_receipt(blob).unwrap_err();
            assert!(matches!(err, IapNormalizerError::ReceiptDecodeFailure { .. }));
        }
    }

    #[test]
    fn reads_original_transaction_id() {
        let purchase_info = encode(
            "{\n\t\"original-transaction-id\" = \"1000000123456789\";\n\t\"transaction-id\" = \"1000000999999999\";\n}",
        );
        let receipt = encode(&format!(
            "{{\n\t\"signature\" = \"sig\";\n\t\"purchase-info\" = \"{purchase_info}\";\n}}"
        ));
        assert_eq!(original_transaction_id(&receipt).unwrap(), "1000000123456789");
    }

    #[test]
    fn missing_purchase_info_fails() {
        let receipt = encode("{ \"signature\" = \"sig\"; }");
        let err = original_transaction_id(&receipt).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to decode App Store receipt: receipt has no purchase-info"
        );
    }

    #[test]
    fn missing_transaction_id_fails() {
        let purchase_info = encode("{ \"transaction-id\" = \"1\"; }");
        let receipt = encode(&format!("{{ \"purchase-info\" = \"{purchase_info}\"; }}"));
        assert!(original_transaction_id(&receipt).is_err());
    }
}
