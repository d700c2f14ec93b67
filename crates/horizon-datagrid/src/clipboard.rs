//! Tab-delimited clipboard codec.
//!
//! Pure text ⇄ 2-D array conversion, shared by copy and paste. Clipboard
//! content is untrusted: `deserialize` never rejects input, it
//! rectangularizes ragged blocks and degrades anything else to a 1×1 grid
//! holding the raw text.

/// Serializes a block: cells joined with horizontal tabs, rows with line
/// feeds. Empty input yields the empty string.
///
/// # Example
///
/// ```
/// use horizon_datagrid::clipboard;
///
/// let block = vec![
///     vec!["a".to_string(), "b".to_string()],
///     vec!["c".to_string(), "d".to_string()],
/// ];
/// assert_eq!(clipboard::serialize(&block), "a\tb\nc\td");
/// ```
pub fn serialize(block: &[Vec<String>]) -> String {
    block
        .iter()
        .map(|row| row.join("\t"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Deserializes clipboard text into a rectangular block.
///
/// Line endings are normalized, trailing blank lines dropped, remaining
/// lines split on tabs, and every row padded with empty strings to the
/// widest row. A single line containing no tab deserializes to a 1×1
/// block holding that line verbatim.
///
/// # Example
///
/// ```
/// use horizon_datagrid::clipboard;
///
/// assert_eq!(
///     clipboard::deserialize("a\tb\r\nc"),
///     vec![
///         vec!["a".to_string(), "b".to_string()],
///         vec!["c".to_string(), String::new()],
///     ],
/// );
/// ```
pub fn deserialize(text: &str) -> Vec<Vec<String>> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

    // A true single-cell paste, as opposed to a one-column row
    if !normalized.contains('\n') && !normalized.contains('\t') {
        return vec![vec![normalized]];
    }

    let mut lines: Vec<&str> = normalized.split('\n').collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }

    let mut block: Vec<Vec<String>> = lines
        .iter()
        .map(|line| line.split('\t').map(str::to_string).collect())
        .collect();

    let width = block.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut block {
        row.resize(width, String::new());
    }
    block
}
