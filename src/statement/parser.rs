//! SSA statement XML parser implementation.

use crate::error::{Error, Result};
use crate::model::{EarningsRecord, Statement};
use std::fs;
use std::path::Path;

const ROOT_ELEMENT: &str = "OnlineSocialSecurityStatementData";
const USER_INFO_ELEMENT: &str = "UserInformation";
const NAME_ELEMENT: &str = "Name";
const EARNINGS_RECORD_ELEMENT: &str = "EarningsRecord";

/// Parser for SSA.gov "my Social Security" statement exports.
///
/// Elements are matched by local name, so the `osss:` namespace prefix used
/// by the export is optional.
pub struct StatementParser {
    xml: String,
}

impl StatementParser {
    /// Open a statement file for parsing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read(path)?;
        Self::from_bytes(data)
    }

    /// Create a parser from bytes. The document must be UTF-8.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let xml = String::from_utf8(data)
            .map_err(|e| Error::InvalidData(format!("statement is not valid UTF-8: {}", e)))?;
        Ok(Self::from_xml(xml))
    }

    /// Create a parser from an XML string.
    pub fn from_xml(xml: impl Into<String>) -> Self {
        let xml = xml.into();
        let xml = match xml.strip_prefix('\u{feff}') {
            Some(rest) => rest.to_string(),
            None => xml,
        };
        Self { xml }
    }

    /// Parse the document into a [`Statement`].
    ///
    /// Fails when the statement root, the user name, or the earnings record
    /// container is missing. An earnings container without entries yields a
    /// statement with no records.
    pub fn parse(&self) -> Result<Statement> {
        let mut reader = quick_xml::Reader::from_str(&self.xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut path: Vec<String> = Vec::new();

        let mut saw_root = false;
        let mut saw_user_info = false;
        let mut saw_earnings_record = false;
        let mut name: Option<String> = None;
        let mut earnings: Vec<EarningsRecord> = Vec::new();
        let mut current: Option<EarningsRecord> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Start(ref e)) => {
                    let local = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                    Self::open_element(
                        &path,
                        &local,
                        e,
                        &mut saw_root,
                        &mut saw_user_info,
                        &mut saw_earnings_record,
                        &mut name,
                        &mut current,
                    )?;
                    path.push(local);
                }
                Ok(quick_xml::events::Event::Empty(ref e)) => {
                    let local = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                    Self::open_element(
                        &path,
                        &local,
                        e,
                        &mut saw_root,
                        &mut saw_user_info,
                        &mut saw_earnings_record,
                        &mut name,
                        &mut current,
                    )?;
                    // Self-closing entry: finish it right away
                    if local == "Earnings" {
                        if let Some(record) = current.take() {
                            earnings.push(record);
                        }
                    }
                }
                Ok(quick_xml::events::Event::Text(ref e)) => {
                    let text = e.unescape()?;
                    let depth = path.len();
                    if Self::is_name_path(&path) {
                        if let Some(ref mut n) = name {
                            n.push_str(&text);
                        }
                    } else if let Some(ref mut record) = current {
                        match path[depth - 1].as_str() {
                            "FicaEarnings" if path[depth - 2] == "Earnings" => {
                                record.fica_earnings.get_or_insert_with(String::new).push_str(&text);
                            }
                            "MedicareEarnings" if path[depth - 2] == "Earnings" => {
                                record
                                    .medicare_earnings
                                    .get_or_insert_with(String::new)
                                    .push_str(&text);
                            }
                            _ => {}
                        }
                    }
                }
                Ok(quick_xml::events::Event::End(ref e)) => {
                    if e.local_name().as_ref() == b"Earnings" && Self::is_earnings_path(&path) {
                        if let Some(record) = current.take() {
                            earnings.push(record);
                        }
                    }
                    path.pop();
                }
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        if !saw_root {
            return Err(Error::MissingComponent(ROOT_ELEMENT.to_string()));
        }
        if !saw_user_info {
            return Err(Error::MissingComponent(format!(
                "{}/{}",
                ROOT_ELEMENT, USER_INFO_ELEMENT
            )));
        }
        let name = name.ok_or_else(|| {
            Error::MissingComponent(format!("{}/{}", USER_INFO_ELEMENT, NAME_ELEMENT))
        })?;
        if !saw_earnings_record {
            return Err(Error::MissingComponent(format!(
                "{}/{}",
                ROOT_ELEMENT, EARNINGS_RECORD_ELEMENT
            )));
        }

        tracing::debug!(records = earnings.len(), "parsed statement");
        Ok(Statement::new(name, earnings))
    }

    /// Track an opening (or self-closing) element at the current path.
    #[allow(clippy::too_many_arguments)]
    fn open_element(
        path: &[String],
        local: &str,
        e: &quick_xml::events::BytesStart<'_>,
        saw_root: &mut bool,
        saw_user_info: &mut bool,
        saw_earnings_record: &mut bool,
        name: &mut Option<String>,
        current: &mut Option<EarningsRecord>,
    ) -> Result<()> {
        match (path.len(), local) {
            (0, ROOT_ELEMENT) => *saw_root = true,
            (1, USER_INFO_ELEMENT) if path[0] == ROOT_ELEMENT => *saw_user_info = true,
            (1, EARNINGS_RECORD_ELEMENT) if path[0] == ROOT_ELEMENT => {
                *saw_earnings_record = true
            }
            (2, NAME_ELEMENT) if Self::is_user_info_path(path) => {
                name.get_or_insert_with(String::new);
            }
            (2, "Earnings") if Self::is_earnings_record_path(path) => {
                let mut record = EarningsRecord::default();
                for attr in e.attributes() {
                    let attr = attr?;
                    if attr.key.local_name().as_ref() == b"endYear" {
                        record.year = Some(attr.unescape_value()?.trim().to_string());
                    }
                }
                *current = Some(record);
            }
            _ => {}
        }
        Ok(())
    }

    fn is_user_info_path(path: &[String]) -> bool {
        path.len() == 2 && path[0] == ROOT_ELEMENT && path[1] == USER_INFO_ELEMENT
    }

    fn is_earnings_record_path(path: &[String]) -> bool {
        path.len() == 2 && path[0] == ROOT_ELEMENT && path[1] == EARNINGS_RECORD_ELEMENT
    }

    fn is_name_path(path: &[String]) -> bool {
        path.len() == 3 && Self::is_user_info_path(&path[..2]) && path[2] == NAME_ELEMENT
    }

    /// Path of an `Earnings` element just before its end tag pops it.
    fn is_earnings_path(path: &[String]) -> bool {
        path.len() == 3 && Self::is_earnings_record_path(&path[..2])
    }
}
