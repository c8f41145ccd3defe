use crate::record::{
    Record, COLUMN_ORDER_CODE, COLUMN_RECIPIENT_ADDRESS, COLUMN_RECIPIENT_PHONE,
    COLUMN_RECIPIENT_NAME,
};
use docx_rs::{
    Docx, DocumentChild, FooterChild, HeaderChild, Paragraph, ParagraphChild, Run, RunChild,
    Table, TableCellContent, TableChild, TableRowChild,
};

/// Persian word for "column", prefixed to the column label in template tokens.
pub(crate) const PLACEHOLDER_PREFIX: &str = "ستون ";

/// Ordered placeholder-to-value pairs for one record.
///
/// Keys are exact strings, not patterns, and are applied in insertion order.
/// The map is built once per record and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct ReplacementMap {
    pairs: Vec<(String, String)>,
}

impl ReplacementMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the replacement map for one record.
    ///
    /// Eight entries in a fixed order: the four bracketed forms first, then
    /// the four bare forms, fields ordered address, phone, order code, name.
    /// A missing field contributes the empty string, so its placeholders are
    /// removed from the output rather than left intact.
    #[must_use]
    pub fn for_record(record: &Record) -> Self {
        let fields = [
            (COLUMN_RECIPIENT_ADDRESS, record.recipient_address()),
            (COLUMN_RECIPIENT_PHONE, record.recipient_phone()),
            (COLUMN_ORDER_CODE, record.order_code()),
            (COLUMN_RECIPIENT_NAME, record.recipient_name()),
        ];

        let mut map = Self::new();
        for (column, value) in fields.iter().copied() {
            map.insert(format!("{{{PLACEHOLDER_PREFIX}{column}}}"), value);
        }
        for (column, value) in fields.iter().copied() {
            map.insert(format!("{PLACEHOLDER_PREFIX}{column}"), value);
        }
        map
    }

    /// Appends a placeholder/value pair.
    pub fn insert(&mut self, placeholder: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((placeholder.into(), value.into()));
    }

    /// Iterates the pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    /// Returns the number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if the map holds no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Replaces placeholder text throughout a document, in place.
///
/// Traversal order: body paragraphs in document order, then body tables in
/// document order (rows, then cells, then each cell's paragraphs; nested
/// tables inside cells are not descended into), then the section header
/// (paragraphs, then tables), then the section footer (paragraphs, then
/// tables).
///
/// Replacement is scoped to a single text run: for each run, each pair is
/// applied in map order, replacing every substring occurrence and leaving
/// the run's formatting untouched. A placeholder whose characters are split
/// across two runs is therefore never matched; that is the documented
/// granularity of the engine, not a defect to patch here.
///
/// Placeholders with no match anywhere are silently ignored, and leftover
/// bracketed tokens are not flagged.
pub fn substitute(document: &mut Docx, replacements: &ReplacementMap) {
    for child in &mut document.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => substitute_paragraph(paragraph, replacements),
            DocumentChild::Table(table) => substitute_table(table, replacements),
            _ => {}
        }
    }

    let section = &mut document.document.section_property;

    if let Some((_, header)) = section.header.as_mut() {
        for child in &mut header.children {
            match child {
                HeaderChild::Paragraph(paragraph) => {
                    substitute_paragraph(paragraph, replacements);
                }
                HeaderChild::Table(table) => substitute_table(table, replacements),
                _ => {}
            }
        }
    }

    if let Some((_, footer)) = section.footer.as_mut() {
        for child in &mut footer.children {
            match child {
                FooterChild::Paragraph(paragraph) => {
                    substitute_paragraph(paragraph, replacements);
                }
                FooterChild::Table(table) => substitute_table(table, replacements),
                _ => {}
            }
        }
    }
}

fn substitute_paragraph(paragraph: &mut Paragraph, replacements: &ReplacementMap) {
    for child in &mut paragraph.children {
        if let ParagraphChild::Run(run) = child {
            substitute_run(run, replacements);
        }
    }
}

fn substitute_run(run: &mut Run, replacements: &ReplacementMap) {
    for child in &mut run.children {
        if let RunChild::Text(text) = child {
            for (placeholder, value) in replacements.iter() {
                if text.text.contains(placeholder) {
                    text.text = text.text.replace(placeholder, value);
                }
            }
        }
    }
}

fn substitute_table(table: &mut Table, replacements: &ReplacementMap) {
    for row in &mut table.rows {
        let TableChild::TableRow(row) = row;
        for cell in &mut row.cells {
            let TableRowChild::TableCell(cell) = cell;
            for content in &mut cell.children {
                if let TableCellContent::Paragraph(paragraph) = content {
                    substitute_paragraph(paragraph, replacements);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{cell_text, paragraph_text};
    use docx_rs::{Footer, Header, TableCell, TableRow};

    fn record() -> Record {
        Record {
            recipient_address: Some("تهران، خیابان آزادی".to_string()),
            recipient_phone: Some("09121234567".to_string()),
            order_code: Some("ORD/42".to_string()),
            recipient_name: Some("علی رضایی".to_string()),
        }
    }

    fn body_texts(docx: &Docx) -> Vec<String> {
        docx.document
            .children
            .iter()
            .filter_map(|c| match c {
                DocumentChild::Paragraph(p) => Some(paragraph_text(p)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_map_order_is_bracketed_then_bare() {
        let map = ReplacementMap::for_record(&record());

        assert_eq!(map.len(), 8);
        let keys: Vec<&str> = map.iter().map(|(p, _)| p).collect();
        assert!(keys[0].starts_with('{'));
        assert!(keys[3].starts_with('{'));
        assert!(!keys[4].starts_with('{'));
        assert_eq!(keys[0], "{ستون آدرس گیرنده}");
        assert_eq!(keys[7], "ستون نام گیرنده");
    }

    #[test]
    fn test_missing_fields_map_to_empty_string() {
        let map = ReplacementMap::for_record(&Record::default());

        assert!(map.iter().all(|(_, v)| v.is_empty()));
    }

    #[test]
    fn test_replaces_all_eight_forms() {
        let mut docx = Docx::new()
            .add_paragraph(
                Paragraph::new().add_run(Run::new().add_text(
                    "{ستون آدرس گیرنده} {ستون تلفن گیرنده} {ستون کد سفارش} {ستون نام گیرنده}",
                )),
            )
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text(
                "ستون آدرس گیرنده ستون تلفن گیرنده ستون کد سفارش ستون نام گیرنده",
            )));

        substitute(&mut docx, &ReplacementMap::for_record(&record()));

        let texts = body_texts(&docx);
        let expected = "تهران، خیابان آزادی 09121234567 ORD/42 علی رضایی";
        assert_eq!(texts[0], expected);
        assert_eq!(texts[1], expected);
    }

    #[test]
    fn test_replaces_every_occurrence_in_a_run() {
        let mut docx = Docx::new().add_paragraph(
            Paragraph::new().add_run(Run::new().add_text("{ستون کد سفارش}-{ستون کد سفارش}")),
        );

        substitute(&mut docx, &ReplacementMap::for_record(&record()));

        assert_eq!(body_texts(&docx)[0], "ORD/42-ORD/42");
    }

    #[test]
    fn test_other_text_is_untouched() {
        let mut docx = Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("سلام {ستون نام گیرنده}!")));

        substitute(&mut docx, &ReplacementMap::for_record(&record()));

        assert_eq!(body_texts(&docx)[0], "سلام علی رضایی!");
    }

    #[test]
    fn test_placeholder_split_across_runs_is_left_alone() {
        // Mixed formatting mid-token produces exactly this shape in real
        // templates; the engine works per run and must not stitch them.
        let mut docx = Docx::new().add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text("{ستون نام"))
                .add_run(Run::new().add_text(" گیرنده}")),
        );

        substitute(&mut docx, &ReplacementMap::for_record(&record()));

        assert_eq!(body_texts(&docx)[0], "{ستون نام گیرنده}");
    }

    #[test]
    fn test_missing_field_replaces_with_empty_string() {
        let mut docx = Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("[{ستون نام گیرنده}]")));

        substitute(&mut docx, &ReplacementMap::for_record(&Record::default()));

        assert_eq!(body_texts(&docx)[0], "[]");
    }

    #[test]
    fn test_replaces_in_table_cells() {
        let table = Table::new(vec![TableRow::new(vec![TableCell::new().add_paragraph(
            Paragraph::new().add_run(Run::new().add_text("{ستون کد سفارش}")),
        )])]);
        let mut docx = Docx::new().add_table(table);

        substitute(&mut docx, &ReplacementMap::for_record(&record()));

        let DocumentChild::Table(table) = &docx.document.children[0] else {
            panic!("expected a table");
        };
        let TableChild::TableRow(row) = &table.rows[0];
        let TableRowChild::TableCell(cell) = &row.cells[0];
        assert_eq!(cell_text(cell), "ORD/42");
    }

    #[test]
    fn test_replaces_in_header_and_footer() {
        let mut docx = Docx::new()
            .header(
                Header::new().add_paragraph(
                    Paragraph::new().add_run(Run::new().add_text("{ستون نام گیرنده}")),
                ),
            )
            .footer(
                Footer::new().add_paragraph(
                    Paragraph::new().add_run(Run::new().add_text("{ستون کد سفارش}")),
                ),
            );

        substitute(&mut docx, &ReplacementMap::for_record(&record()));

        let section = &docx.document.section_property;
        let (_, header) = section.header.as_ref().unwrap();
        let HeaderChild::Paragraph(paragraph) = &header.children[0] else {
            panic!("expected a paragraph");
        };
        assert_eq!(paragraph_text(paragraph), "علی رضایی");

        let (_, footer) = section.footer.as_ref().unwrap();
        let FooterChild::Paragraph(paragraph) = &footer.children[0] else {
            panic!("expected a paragraph");
        };
        assert_eq!(paragraph_text(paragraph), "ORD/42");
    }

    #[test]
    fn test_unmatched_placeholders_are_ignored() {
        let mut docx =
            Docx::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("بدون توکن")));

        substitute(&mut docx, &ReplacementMap::for_record(&record()));

        assert_eq!(body_texts(&docx)[0], "بدون توکن");
    }

    #[test]
    fn test_tree_shape_is_preserved() {
        let mut docx = Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("{ستون نام گیرنده}")))
            .add_table(Table::new(vec![TableRow::new(vec![TableCell::new()])]));

        let before = docx.document.children.len();
        substitute(&mut docx, &ReplacementMap::for_record(&record()));

        assert_eq!(docx.document.children.len(), before);
    }
}
