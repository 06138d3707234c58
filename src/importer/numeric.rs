// ==========================================
// 全球服务价格手册与报价系统 - 金额文本解析
// ==========================================
// 职责: 货币格式文本 → 数值 / 无值
// 红线: 无值绝不折算为 0 (缺价不等于免费)
// ==========================================

/// 单元格中可能出现的货币标记 (大小写不敏感, 任意位置)
const CURRENCY_TOKENS: [&str; 5] = ["US$", "EUR", "GBP", "€", "£"];

/// 解析货币格式的单元格文本。
///
/// 规则:
/// - 去除货币标记 (US$/EUR/GBP/€/£) 与分组字符 (逗号/美元符/空白)
/// - 仅当原始文本含至少一个数字且清洗结果可解析为数值时返回 Some
/// - 空串 / "N/A" / "TBC" 等一律返回 None
pub fn coerce_rate(raw: &str) -> Option<f64> {
    if !raw.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut cleaned = raw.to_string();
    for token in CURRENCY_TOKENS {
        cleaned = remove_token_ci(&cleaned, token);
    }
    cleaned.retain(|c| c != ',' && c != '$' && !c.is_whitespace());

    cleaned.parse::<f64>().ok()
}

/// 大小写不敏感地删除 token 的所有出现
fn remove_token_ci(text: &str, token: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let token_chars: Vec<char> = token.chars().flat_map(|c| c.to_lowercase()).collect();
    let mut result = String::with_capacity(text.len());
    let mut pos = 0;

    while pos < chars.len() {
        let matches = chars[pos..]
            .iter()
            .flat_map(|c| c.to_lowercase())
            .take(token_chars.len())
            .eq(token_chars.iter().copied());
        if matches && pos + token_chars.len() <= chars.len() {
            pos += token_chars.len();
        } else {
            result.push(chars[pos]);
            pos += 1;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_number() {
        assert_eq!(coerce_rate("48000"), Some(48000.0));
        assert_eq!(coerce_rate("5995.5"), Some(5995.5));
    }

    #[test]
    fn test_currency_and_grouping() {
        assert_eq!(coerce_rate("$1,234.50"), Some(1234.50));
        assert_eq!(coerce_rate("US$5,995"), Some(5995.0));
        assert_eq!(coerce_rate("us$ 5,995"), Some(5995.0));
        assert_eq!(coerce_rate("EUR 1 200"), Some(1200.0));
        assert_eq!(coerce_rate("£36,000"), Some(36000.0));
        assert_eq!(coerce_rate("€ 2,500.00"), Some(2500.0));
    }

    #[test]
    fn test_no_value_cells() {
        assert_eq!(coerce_rate(""), None);
        assert_eq!(coerce_rate("   "), None);
        assert_eq!(coerce_rate("N/A"), None);
        assert_eq!(coerce_rate("TBC"), None);
        assert_eq!(coerce_rate("-"), None);
    }

    #[test]
    fn test_digitless_currency_text() {
        // 含货币符号但无数字: 无值
        assert_eq!(coerce_rate("US$"), None);
        assert_eq!(coerce_rate("$"), None);
    }

    #[test]
    fn test_garbage_with_digits() {
        // 含数字但清洗后仍非数值: 无值
        assert_eq!(coerce_rate("ver2.0.1"), None);
        assert_eq!(coerce_rate("12-34"), None);
    }
}
