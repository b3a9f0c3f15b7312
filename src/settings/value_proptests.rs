use super::*;
use proptest::prelude::*;

proptest! {
    /// 整数から bool への変換は 0 かどうかだけで決まる
    #[test]
    fn prop_int_to_bool(i in any::<i64>()) {
        let value = SettingType::Bool.coerce("k", SettingValue::Int(i)).unwrap();
        prop_assert_eq!(value, SettingValue::Bool(i != 0));
    }

    /// 10 進表記の文字列は同じ整数になる
    #[test]
    fn prop_decimal_string_to_int(i in any::<i64>()) {
        let value = SettingType::Int.parse("k", &i.to_string()).unwrap();
        prop_assert_eq!(value, SettingValue::Int(i));
    }

    /// 変換済みの値をもう一度変換しても変わらない
    #[test]
    fn prop_coerce_is_idempotent(s in "[a-z0-9 ]{0,12}") {
        for t in [SettingType::Bool, SettingType::Int, SettingType::Str, SettingType::Credentials] {
            if let Ok(once) = t.parse("k", &s) {
                let twice = t.coerce("k", once.clone()).unwrap();
                prop_assert_eq!(once, twice);
            }
        }
    }
}
