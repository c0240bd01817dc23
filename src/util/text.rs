/// 以中文數量單位(億/萬)格式化大額數值,儀表板的成交額欄位用
pub fn format_cn_units(num: f64) -> String {
    if !num.is_finite() {
        return "N/A".to_string();
    }

    let abs_num = num.abs();
    if abs_num >= 1e8 {
        format!("{:.2}億", num / 1e8)
    } else if abs_num >= 1e4 {
        format!("{:.2}萬", num / 1e4)
    } else {
        format!("{:.2}", num)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_cn_units() {
        assert_eq!(format_cn_units(123_456_789.0), "1.23億");
        assert_eq!(format_cn_units(56_789.0), "5.68萬");
        assert_eq!(format_cn_units(999.456), "999.46");
        assert_eq!(format_cn_units(-250_000_000.0), "-2.50億");
        assert_eq!(format_cn_units(f64::NAN), "N/A");
    }
}
