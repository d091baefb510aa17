//! Records in the legacy attribute-list layout
//!
//! A record travels as an int slot holding its attribute count less two,
//! one `name=value` string per attribute other than `MyType` and
//! `TargetType`, and finally the bare values of those two. A stream of
//! records puts a non-zero int before each one and a zero int after the
//! last.
//!
//! Reading reverses this by rebuilding the text of each record, so the
//! parser can take it from there.

use crate::error::CedarResult;
use crate::input::CedarReader;
use crate::output::CedarWriter;
use classad_ast::{Expr, ExprRef, RecordExpr, Value};
use classad_diagnostics::{CAD0200, CAD0201, CAD0202, CAD0203, CAD0204, ClassAdError, ErrorCode};
use classad_types::escape_string;
use std::io::{self, Read, Write};

const MY_TYPE: &str = "MyType";
const TARGET_TYPE: &str = "TargetType";

/// Write `record` in the legacy layout
///
/// Both `MyType` and `TargetType` must be present and hold strings.
pub fn transmit<W: Write>(record: &RecordExpr, out: &mut CedarWriter<W>) -> CedarResult<()> {
    let my_type = type_attribute(record, MY_TYPE, CAD0200, CAD0201)?;
    let target_type = type_attribute(record, TARGET_TYPE, CAD0202, CAD0203)?;

    let count = i32::try_from(record.len() - 2).map_err(|_| {
        ClassAdError::transport(CAD0204, format!("{} attributes is too many", record.len()))
    })?;
    out.write_int(count)?;
    for (name, value) in record.iter() {
        if is_type_attribute(name.canonical()) {
            continue;
        }
        out.write_utf(&format!("{name}={value}"))?;
    }
    out.write_utf(&my_type)?;
    out.write_utf(&target_type)?;
    Ok(())
}

fn type_attribute(
    record: &RecordExpr,
    name: &str,
    missing: ErrorCode,
    not_string: ErrorCode,
) -> Result<String, ClassAdError> {
    let Some(expr) = record.get_str(name) else {
        return Err(ClassAdError::transport(missing, format!("no {name} attribute")));
    };
    match expr.value() {
        Some(Value::String(s)) => Ok(s.to_string()),
        _ => Err(ClassAdError::transport(
            not_string,
            format!("bad {name} attribute: {} is not a string", expr.type_name()),
        )),
    }
}

fn is_type_attribute(canonical: &str) -> bool {
    canonical == "mytype" || canonical == "targettype"
}

/// Writes a stream of records in the legacy layout
#[derive(Debug)]
pub struct LegacyAdWriter<W: Write> {
    out: CedarWriter<W>,
    count: usize,
}

impl<W: Write> LegacyAdWriter<W> {
    pub fn new(out: CedarWriter<W>) -> Self {
        Self { out, count: 0 }
    }

    /// Append one record; anything but a record is refused
    pub fn write_ad(&mut self, ad: &Expr) -> CedarResult<()> {
        let Some(record) = ad.as_record() else {
            return Err(ClassAdError::transport(
                CAD0204,
                format!("only records can be sent, found {}", ad.type_name()),
            )
            .into());
        };
        self.out.write_int(1)?;
        transmit(record, &mut self.out)?;
        self.count += 1;
        Ok(())
    }

    /// Mark the end of the records and of the message
    pub fn finish(mut self) -> CedarResult<CedarWriter<W>> {
        self.out.write_int(0)?;
        self.out.end_of_message()?;
        log::debug!("sent {} records", self.count);
        Ok(self.out)
    }
}

/// Reads a stream of records in the legacy layout
///
/// As a [`Read`] it yields the text of every record in turn, each followed
/// by `;` and a newline. As an [`Iterator`] it yields parsed records.
/// Either way the stream ends at a zero flag or at the end of the message.
#[derive(Debug)]
pub struct LegacyAdReader<R: Read> {
    input: CedarReader<R>,
    pending: Vec<u8>,
    pos: usize,
    done: bool,
}

impl<R: Read> LegacyAdReader<R> {
    pub fn new(input: CedarReader<R>) -> Self {
        Self {
            input,
            pending: Vec::new(),
            pos: 0,
            done: false,
        }
    }

    pub fn into_inner(self) -> CedarReader<R> {
        self.input
    }

    /// The text of the next record, such as
    /// `[a=b;\nMyType="Job";\nTargetType="Machine"];\n`
    pub fn read_text(&mut self) -> CedarResult<Option<String>> {
        if self.done {
            return Ok(None);
        }
        match self.input.read_int() {
            Ok(0) => {
                self.done = true;
                return Ok(None);
            }
            Ok(_) => {}
            Err(e) if e.is_end_of_message() => {
                self.done = true;
                return Ok(None);
            }
            Err(e) => return Err(e),
        }

        let count = self.input.read_int()?;
        if count < 0 {
            self.done = true;
            return Err(
                ClassAdError::transport(CAD0204, format!("negative attribute count {count}")).into(),
            );
        }
        let mut text = String::from("[");
        for _ in 0..count {
            text.push_str(&self.input.read_utf()?);
            text.push_str(";\n");
        }
        let my_type = self.input.read_utf()?;
        let target_type = self.input.read_utf()?;
        text.push_str(&format!(
            "{MY_TYPE}={};\n{TARGET_TYPE}={}];\n",
            escape_string(&my_type, '"'),
            escape_string(&target_type, '"')
        ));
        Ok(Some(text))
    }

    /// The next record, parsed
    pub fn read_record(&mut self) -> CedarResult<Option<ExprRef>> {
        let Some(text) = self.read_text()? else {
            return Ok(None);
        };
        let body = text.strip_suffix(";\n").unwrap_or(&text);
        Ok(Some(classad_parser::parse_record(body)?))
    }
}

impl<R: Read> Read for LegacyAdReader<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if self.pos >= self.pending.len() {
            match self.read_text()? {
                Some(text) => {
                    self.pending = text.into_bytes();
                    self.pos = 0;
                }
                None => return Ok(0),
            }
        }
        let n = out.len().min(self.pending.len() - self.pos);
        out[..n].copy_from_slice(&self.pending[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

impl<R: Read> Iterator for LegacyAdReader<R> {
    type Item = CedarResult<ExprRef>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.read_record();
        if next.is_err() {
            self.done = true;
        }
        next.transpose()
    }
}
