use crate::record::Record;

/// Characters that are unsafe in filenames on common filesystems.
const INVALID_FILENAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Derives a filesystem-safe output filename from a record's identifying
/// fields.
///
/// The order code (with `/` replaced by `_`) and the recipient name (with
/// spaces replaced by `_`) are joined as `<order>_<name>.<extension>`. An
/// absent or empty order code falls back to `order_<index>`, an absent or
/// empty name to `customer_<index>`. Finally every character from
/// ``< > : " / \ | ? *`` anywhere in the result is replaced with `_`.
///
/// Deterministic for a given record and index. Two records with the same
/// order code and name collide, and the later write wins; that is the
/// documented behavior, not corrected here.
#[must_use]
pub fn generate_filename(record: &Record, index: usize, extension: &str) -> String {
    let order_code = record.order_code();
    let order_key = if order_code.is_empty() {
        format!("order_{index}")
    } else {
        order_code.replace('/', "_")
    };

    let name = record.recipient_name();
    let name_key = if name.is_empty() {
        format!("customer_{index}")
    } else {
        name.replace(' ', "_")
    };

    let filename = format!("{order_key}_{name_key}.{extension}");
    filename
        .chars()
        .map(|c| {
            if INVALID_FILENAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(order_code: &str, name: &str) -> Record {
        Record {
            order_code: Some(order_code.to_string()),
            recipient_name: Some(name.to_string()),
            ..Record::default()
        }
    }

    #[test]
    fn test_basic_filename() {
        let filename = generate_filename(&record("A-1", "علی رضایی"), 1, "docx");
        assert_eq!(filename, "A-1_علی_رضایی.docx");
    }

    #[test]
    fn test_slashes_in_order_code_become_underscores() {
        let filename = generate_filename(&record("ORD/42/B", "Bob"), 1, "docx");
        assert_eq!(filename, "ORD_42_B_Bob.docx");
    }

    #[test]
    fn test_fallback_naming_at_index() {
        let filename = generate_filename(&record("", ""), 5, "docx");
        assert_eq!(filename, "order_5_customer_5.docx");
    }

    #[test]
    fn test_absent_fields_fall_back_too() {
        let filename = generate_filename(&Record::default(), 3, "docx");
        assert_eq!(filename, "order_3_customer_3.docx");
    }

    #[test]
    fn test_no_invalid_characters_survive() {
        let filename = generate_filename(&record("a<b>c:d\"e", "f\\g|h?i*j"), 1, "docx");
        assert!(!filename.contains(INVALID_FILENAME_CHARS));
    }

    #[test]
    fn test_deterministic() {
        let r = record("A-1", "Bob Smith");
        assert_eq!(
            generate_filename(&r, 7, "docx"),
            generate_filename(&r, 7, "docx")
        );
    }

    #[test]
    fn test_index_changes_only_fallback_names() {
        let r = record("A-1", "Bob");
        assert_eq!(
            generate_filename(&r, 1, "docx"),
            generate_filename(&r, 2, "docx")
        );

        let empty = record("", "");
        assert_ne!(
            generate_filename(&empty, 1, "docx"),
            generate_filename(&empty, 2, "docx")
        );
    }
}
