//! Plain text parser and writer for the input tables of the linenv inference.
//!
//! A file contains up to four tables. Each table starts with a header line
//! `t <name> <rows> <cols>`, where `<name>` is one of `unary`, `pairwise`, `coeffs` or `cliques`,
//! and is followed by exactly `<rows>` lines of `<cols>` whitespace separated numbers. A table
//! with zero columns has no row lines. Lines starting with `c` are comments, empty lines are
//! ignored. Tables that are not present are empty.
//!
//! ```text
//! c two variables, one clique
//! t unary 2 2
//! 0 1.5
//! 2 0
//! t pairwise 1 3
//! 1 2 0.5
//! t coeffs 2 2
//! 2 0
//! 1 0.25
//! t cliques 2 1
//! 1
//! 1
//! ```
use std::{fmt, io};

use anyhow::Error;
use thiserror::Error;

use linenv_model::Table;

/// The four input tables.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TableName {
    Unary,
    Pairwise,
    Coeffs,
    Cliques,
}

impl TableName {
    /// All tables in file order.
    pub const ALL: [TableName; 4] = [
        TableName::Unary,
        TableName::Pairwise,
        TableName::Coeffs,
        TableName::Cliques,
    ];

    /// Name used in table headers.
    pub fn as_str(self) -> &'static str {
        match self {
            TableName::Unary => "unary",
            TableName::Pairwise => "pairwise",
            TableName::Coeffs => "coeffs",
            TableName::Cliques => "cliques",
        }
    }

    fn from_str(name: &str) -> Option<TableName> {
        TableName::ALL
            .iter()
            .cloned()
            .find(|table| table.as_str() == name)
    }

    fn position(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Possible errors while parsing tables.
#[derive(Debug, Error)]
pub enum ParserError {
    #[error("line {}: Unexpected input outside of a table: '{}'", line, text)]
    UnexpectedInput { line: usize, text: String },
    #[error("line {}: Invalid header syntax: {}", line, header)]
    InvalidHeader { line: usize, header: String },
    #[error("line {}: Unknown table '{}'", line, name)]
    UnknownTable { line: usize, name: String },
    #[error("line {}: Table '{}' is given more than once", line, name)]
    DuplicateTable { line: usize, name: TableName },
    #[error("line {}: Invalid number '{}'", line, token)]
    InvalidNumber { line: usize, token: String },
    #[error(
        "line {}: Row has {} entries while table '{}' has {} columns",
        line,
        len,
        name,
        expected
    )]
    RowLength {
        line: usize,
        name: TableName,
        len: usize,
        expected: usize,
    },
    #[error(
        "Table '{}' has {} rows while the header specifies {} rows",
        name,
        rows,
        header_rows
    )]
    RowCount {
        name: TableName,
        rows: usize,
        header_rows: usize,
    },
    #[error("Parser invoked after a previous error")]
    PreviousError,
}

/// The tables read from a file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableSet {
    pub unary: Table,
    pub pairwise: Table,
    pub coeffs: Table,
    pub cliques: Table,
}

impl TableSet {
    /// Access a table by name.
    pub fn get(&self, name: TableName) -> &Table {
        match name {
            TableName::Unary => &self.unary,
            TableName::Pairwise => &self.pairwise,
            TableName::Coeffs => &self.coeffs,
            TableName::Cliques => &self.cliques,
        }
    }

    fn get_mut(&mut self, name: TableName) -> &mut Table {
        match name {
            TableName::Unary => &mut self.unary,
            TableName::Pairwise => &mut self.pairwise,
            TableName::Coeffs => &mut self.coeffs,
            TableName::Cliques => &mut self.cliques,
        }
    }
}

/// Header of the table currently being read.
#[derive(Copy, Clone, Debug)]
struct OpenTable {
    name: TableName,
    rows: usize,
    cols: usize,
    rows_read: usize,
}

/// Line based parser for table files.
#[derive(Default)]
pub struct TableParser {
    tables: TableSet,
    seen: [bool; 4],
    open: Option<OpenTable>,
    row: Vec<f64>,
    line_number: usize,
    error: bool,
}

impl TableParser {
    /// Create a new parser.
    pub fn new() -> TableParser {
        TableParser::default()
    }

    /// Parse the whole input.
    pub fn parse(input: impl io::Read) -> Result<TableSet, Error> {
        use io::BufRead;

        let mut parser = TableParser::new();
        for line in io::BufReader::new(input).lines() {
            parser.parse_line(&line?)?;
        }
        parser.eof()?;
        Ok(parser.take_tables())
    }

    /// Parse a single line, without its line terminator.
    ///
    /// If this method returns an error, the parser is in an invalid state and cannot parse further
    /// lines.
    pub fn parse_line(&mut self, line: &str) -> Result<(), ParserError> {
        if self.error {
            return Err(ParserError::PreviousError);
        }
        self.line_number += 1;
        let result = self.parse_line_inner(line.trim());
        if result.is_err() {
            self.error = true;
        }
        result
    }

    fn parse_line_inner(&mut self, line: &str) -> Result<(), ParserError> {
        if line.is_empty() || line.starts_with('c') {
            return Ok(());
        }
        if line.starts_with('t') {
            self.close_table()?;
            return self.parse_header(line);
        }

        let open = match self.open.as_mut() {
            Some(open) if open.rows_read < open.rows => open,
            _ => {
                return Err(ParserError::UnexpectedInput {
                    line: self.line_number,
                    text: line.to_owned(),
                })
            }
        };

        let line_number = self.line_number;
        self.row.clear();
        for token in line.split_whitespace() {
            let value = token
                .parse::<f64>()
                .map_err(|_| ParserError::InvalidNumber {
                    line: line_number,
                    token: token.to_owned(),
                })?;
            self.row.push(value);
        }

        if self.row.len() != open.cols {
            return Err(ParserError::RowLength {
                line: line_number,
                name: open.name,
                len: self.row.len(),
                expected: open.cols,
            });
        }

        open.rows_read += 1;
        let name = open.name;
        let pushed = self.tables.get_mut(name).push_row(&self.row);
        debug_assert!(pushed.is_ok());
        Ok(())
    }

    fn parse_header(&mut self, line: &str) -> Result<(), ParserError> {
        let mut values = line.split_whitespace();
        if values.next() != Some("t") {
            return self.invalid_header(line);
        }

        let name = match values.next() {
            None => return self.invalid_header(line),
            Some(name) => match TableName::from_str(name) {
                Some(table) => table,
                None => {
                    return Err(ParserError::UnknownTable {
                        line: self.line_number,
                        name: name.to_owned(),
                    })
                }
            },
        };

        let rows: usize = match values.next().and_then(|value| str::parse(value).ok()) {
            None => return self.invalid_header(line),
            Some(value) => value,
        };
        let cols: usize = match values.next().and_then(|value| str::parse(value).ok()) {
            None => return self.invalid_header(line),
            Some(value) => value,
        };
        if values.next().is_some() {
            return self.invalid_header(line);
        }

        if self.seen[name.position()] {
            return Err(ParserError::DuplicateTable {
                line: self.line_number,
                name,
            });
        }
        self.seen[name.position()] = true;

        // Keep the column count of tables without rows. Rows without columns have no lines.
        let rows_read = if cols == 0 { rows } else { 0 };
        *self.tables.get_mut(name) = Table::zeros(rows_read, cols);
        self.open = Some(OpenTable {
            name,
            rows,
            cols,
            rows_read,
        });
        Ok(())
    }

    fn invalid_header(&self, line: &str) -> Result<(), ParserError> {
        Err(ParserError::InvalidHeader {
            line: self.line_number,
            header: line.to_owned(),
        })
    }

    fn close_table(&mut self) -> Result<(), ParserError> {
        if let Some(open) = self.open.take() {
            if open.rows_read != open.rows {
                return Err(ParserError::RowCount {
                    name: open.name,
                    rows: open.rows_read,
                    header_rows: open.rows,
                });
            }
        }
        Ok(())
    }

    /// Finish parsing the input.
    pub fn eof(&mut self) -> Result<(), ParserError> {
        if self.error {
            return Err(ParserError::PreviousError);
        }
        let result = self.close_table();
        if result.is_err() {
            self.error = true;
        }
        result
    }

    /// Returns the tables parsed so far, leaving empty tables behind.
    pub fn take_tables(&mut self) -> TableSet {
        std::mem::take(&mut self.tables)
    }

    /// Number of lines parsed.
    pub fn line_count(&self) -> usize {
        self.line_number
    }
}

/// Write a single table including its header.
pub fn write_table(target: &mut impl io::Write, name: TableName, table: &Table) -> io::Result<()> {
    writeln!(
        target,
        "t {name} {rows} {cols}",
        name = name,
        rows = table.rows(),
        cols = table.cols()
    )?;
    if table.cols() == 0 {
        return Ok(());
    }
    for row in table.iter_rows() {
        for (col, &value) in row.iter().enumerate() {
            if col > 0 {
                target.write_all(b" ")?;
            }
            write_value(&mut *target, value)?;
        }
        target.write_all(b"\n")?;
    }
    Ok(())
}

/// Write all non-empty tables.
pub fn write_tables(target: &mut impl io::Write, tables: &TableSet) -> io::Result<()> {
    for &name in TableName::ALL.iter() {
        let table = tables.get(name);
        if !table.is_empty() {
            write_table(&mut *target, name, table)?;
        }
    }
    Ok(())
}

/// Largest magnitude below which every integer is exactly representable.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

fn write_value(target: &mut impl io::Write, value: f64) -> io::Result<()> {
    if value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
        itoa::write(&mut *target, value as i64)?;
        Ok(())
    } else {
        write!(target, "{}", value)
    }
}
