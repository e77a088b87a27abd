//! Mapping spans back to program fragments and lines.
//!
//! A program may be supplied as several named fragments. They are laid out
//! back to back in one offset space, one byte apart, so every span is unique
//! and identifies its fragment.

use std::fmt;

use wgl_ir::{Span, SpanError};

/// Pre-computed line starts for O(log L) line lookup.
#[derive(Clone, Debug, Default)]
pub struct LineOffsetTable {
    /// Byte offset of each line start; `offsets[0] == 0`.
    offsets: Vec<u32>,
}

impl LineOffsetTable {
    /// Build a line offset table from source text.
    pub fn build(source: &str) -> Self {
        let mut offsets = vec![0u32];
        for (i, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                offsets.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
            }
        }
        LineOffsetTable { offsets }
    }

    /// 1-based line containing `offset`.
    #[inline]
    pub fn line_from_offset(&self, offset: u32) -> u32 {
        let line_idx = match self.offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        u32::try_from(line_idx).unwrap_or(u32::MAX - 1) + 1
    }

    /// 1-based (line, column); the column counts characters.
    pub fn offset_to_line_col(&self, source: &str, offset: u32) -> (u32, u32) {
        let line = self.line_from_offset(offset);
        let line_start = self.line_start_offset(line).unwrap_or(0) as usize;
        let end = (offset as usize).min(source.len());
        let col = source
            .get(line_start..end)
            .map_or(0, |text| text.chars().count());
        (line, u32::try_from(col).unwrap_or(u32::MAX - 1) + 1)
    }

    /// Byte offset of a 1-based line.
    pub fn line_start_offset(&self, line: u32) -> Option<u32> {
        if line == 0 {
            return None;
        }
        self.offsets.get((line - 1) as usize).copied()
    }

    pub fn line_count(&self) -> usize {
        self.offsets.len()
    }
}

/// One named piece of program text.
#[derive(Clone, Debug)]
pub struct SourceFragment {
    pub name: String,
    pub text: String,
    /// Offset of the fragment's first byte in the shared offset space.
    pub start: u32,
    lines: LineOffsetTable,
}

impl SourceFragment {
    /// Offset one past the fragment's last byte.
    pub fn end(&self) -> u32 {
        self.start + u32::try_from(self.text.len()).unwrap_or(u32::MAX - self.start)
    }
}

/// A resolved source position.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Location<'a> {
    pub fragment: &'a str,
    pub fragment_index: usize,
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Location<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.fragment, self.line)
    }
}

/// All fragments of one compilation.
#[derive(Clone, Debug, Default)]
pub struct SourceMap {
    fragments: Vec<SourceFragment>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A map holding one fragment.
    pub fn single(name: impl Into<String>, text: impl Into<String>) -> Result<Self, SpanError> {
        let mut map = SourceMap::new();
        map.add_fragment(name, text)?;
        Ok(map)
    }

    /// Append a fragment after the existing ones.
    pub fn add_fragment(
        &mut self,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<(), SpanError> {
        let text = text.into();
        let start = self.fragments.last().map_or(0, |f| f.end() as usize + 1);
        let span = Span::try_from_range(start..start + text.len())?;
        self.fragments.push(SourceFragment {
            name: name.into(),
            lines: LineOffsetTable::build(&text),
            text,
            start: span.start,
        });
        Ok(())
    }

    pub fn fragments(&self) -> &[SourceFragment] {
        &self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Index of the fragment containing `offset`.
    pub fn fragment_index(&self, offset: u32) -> Option<usize> {
        let index = self.fragments.partition_point(|f| f.start <= offset);
        let index = index.checked_sub(1)?;
        let fragment = &self.fragments[index];
        (offset <= fragment.end()).then_some(index)
    }

    /// Resolve the start of `span`.
    pub fn locate(&self, span: Span) -> Option<Location<'_>> {
        let index = self.fragment_index(span.start)?;
        let fragment = &self.fragments[index];
        let (line, column) = fragment
            .lines
            .offset_to_line_col(&fragment.text, span.start - fragment.start);
        Some(Location {
            fragment: &fragment.name,
            fragment_index: index,
            line,
            column,
        })
    }

    /// The whole line holding the start of `span`, without its newline.
    pub fn line_text(&self, span: Span) -> Option<&str> {
        let fragment = &self.fragments[self.fragment_index(span.start)?];
        let offset = span.start - fragment.start;
        let line = fragment.lines.line_from_offset(offset);
        let start = fragment.lines.line_start_offset(line)? as usize;
        let rest = fragment.text.get(start..)?;
        Some(rest.split('\n').next().unwrap_or(rest).trim_end_matches('\r'))
    }

    /// Text covered by `span`, if it lies within one fragment.
    pub fn snippet(&self, span: Span) -> Option<&str> {
        let fragment = &self.fragments[self.fragment_index(span.start)?];
        let start = (span.start - fragment.start) as usize;
        let end = span.end.checked_sub(fragment.start)? as usize;
        fragment.text.get(start..end)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_line_offset_table() {
        let source = "line1\nline2\nline3";
        let table = LineOffsetTable::build(source);
        assert_eq!(table.offset_to_line_col(source, 0), (1, 1));
        assert_eq!(table.offset_to_line_col(source, 6), (2, 1));
        assert_eq!(table.offset_to_line_col(source, 14), (3, 3));
        assert_eq!(table.line_count(), 3);
        assert_eq!(table.line_start_offset(0), None);
        assert_eq!(table.line_start_offset(2), Some(6));
    }

    #[test]
    fn test_locate_across_fragments() {
        let mut map = SourceMap::new();
        assert!(map.add_fragment("common", "precision mediump float;\n").is_ok());
        assert!(map.add_fragment("main", "void main()\n{\n}\n").is_ok());

        let second = map.fragments()[1].start;
        assert_eq!(second, 26);

        let loc = map.locate(Span::new(second + 12, second + 13));
        assert_eq!(
            loc,
            Some(Location {
                fragment: "main",
                fragment_index: 1,
                line: 2,
                column: 1,
            })
        );
        assert_eq!(loc.map(|l| l.to_string()), Some("main:2".to_owned()));
    }

    #[test]
    fn test_snippet() {
        let map = SourceMap::single("shader", "uniform vec4 color;").unwrap_or_default();
        assert_eq!(map.snippet(Span::new(8, 12)), Some("vec4"));
    }

    #[test]
    fn test_line_text() {
        let mut map = SourceMap::new();
        assert!(map.add_fragment("common", "precision mediump float;\n").is_ok());
        assert!(map.add_fragment("main", "void main()\r\n{\n    discard;\n}").is_ok());
        let second = map.fragments()[1].start;

        assert_eq!(map.line_text(Span::new(10, 16)), Some("precision mediump float;"));
        assert_eq!(map.line_text(Span::new(second + 5, second + 9)), Some("void main()"));
        assert_eq!(map.line_text(Span::new(second + 20, second + 27)), Some("    discard;"));
        assert_eq!(map.line_text(Span::new(10_000, 10_001)), None);
    }

    #[test]
    fn test_locate_outside() {
        let map = SourceMap::new();
        assert!(map.is_empty());
        assert_eq!(map.locate(Span::new(3, 4)), None);
    }
}
