//! Bulk inventory log: one `product#aisle#shelf#quantity` record per line.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

pub const MAX_INPUT_BYTES: usize = 50_000;
pub const MAX_LINES: usize = 1000;
pub const MAX_LINE_CHARS: usize = 150;

static LINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([^#]+)#([0-9]+)#([0-9]+)#([0-9]+)$").expect("Valid regex pattern")
});

/// Request-level rejection; nothing is parsed when one of these is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error("El contenido es demasiado grande ({bytes} bytes). Máximo 50000 bytes permitidos.")]
    TooLarge { bytes: usize },
    #[error("El número de líneas ({lines}) excede el máximo permitido (1000).")]
    TooManyLines { lines: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineErrorKind {
    TooLong,
    Malformed,
    NumberTooLarge,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineError {
    /// 1-based position in the submitted text.
    pub line: usize,
    /// The trimmed line as submitted.
    pub text: String,
    pub kind: LineErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryEntry {
    pub product: String,
    pub aisle: u32,
    pub shelf: u32,
    pub quantity: u32,
}

/// Parses one trimmed, non-blank line.
pub fn parse_line(line: &str) -> Result<InventoryEntry, LineErrorKind> {
    if line.chars().count() > MAX_LINE_CHARS {
        return Err(LineErrorKind::TooLong);
    }
    let caps = LINE_PATTERN
        .captures(line)
        .ok_or(LineErrorKind::Malformed)?;
    let number = |i: usize| {
        caps[i]
            .parse::<u32>()
            .map_err(|_| LineErrorKind::NumberTooLarge)
    };
    Ok(InventoryEntry {
        product: caps[1].trim().to_string(),
        aisle: number(2)?,
        shelf: number(3)?,
        quantity: number(4)?,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductAggregate {
    pub product: String,
    /// In input order.
    pub entries: Vec<InventoryEntry>,
}

/// Stock at one (aisle, shelf) location of a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationGroup {
    pub aisle: u32,
    /// Distinct shelves, ascending. Groups are keyed by shelf, so this holds
    /// a single value.
    pub shelves: Vec<u32>,
    pub quantity: u64,
}

impl ProductAggregate {
    pub fn total_quantity(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity)).sum()
    }

    /// Entries grouped by (aisle, shelf) in first-seen order.
    pub fn locations(&self) -> Vec<LocationGroup> {
        let mut groups: Vec<LocationGroup> = Vec::new();
        let mut index: HashMap<(u32, u32), usize> = HashMap::new();
        for entry in &self.entries {
            let slot = *index.entry((entry.aisle, entry.shelf)).or_insert_with(|| {
                groups.push(LocationGroup {
                    aisle: entry.aisle,
                    shelves: Vec::new(),
                    quantity: 0,
                });
                groups.len() - 1
            });
            let group = &mut groups[slot];
            if !group.shelves.contains(&entry.shelf) {
                group.shelves.push(entry.shelf);
                group.shelves.sort_unstable();
            }
            group.quantity += u64::from(entry.quantity);
        }
        groups
    }
}

impl LocationGroup {
    /// e.g. "15 unidades en el pasillo 2, estantería 3."
    pub fn describe(&self) -> String {
        let shelves: Vec<String> = self.shelves.iter().map(|s| s.to_string()).collect();
        let shelf_word = if self.shelves.len() == 1 {
            "estantería"
        } else {
            "estanterías"
        };
        format!(
            "{} en el pasillo {}, {} {}.",
            units(self.quantity),
            self.aisle,
            shelf_word,
            shelves.join(" y ")
        )
    }
}

/// "1 unidad", "0 unidades", "7 unidades".
pub fn units(n: u64) -> String {
    if n == 1 {
        "1 unidad".to_string()
    } else {
        format!("{n} unidades")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseOutcome {
    /// At least one line was rejected; nothing is aggregated.
    Error { errors_by_line: Vec<LineError> },
    /// Products in first-seen order.
    Success { products: Vec<ProductAggregate> },
}

pub fn parse_log(raw: &str) -> Result<ParseOutcome, InventoryError> {
    if raw.len() > MAX_INPUT_BYTES {
        return Err(InventoryError::TooLarge { bytes: raw.len() });
    }
    let lines: Vec<&str> = raw.split('\n').collect();
    if lines.len() > MAX_LINES {
        return Err(InventoryError::TooManyLines { lines: lines.len() });
    }

    let mut errors = Vec::new();
    let mut products: Vec<ProductAggregate> = Vec::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for (i, line) in lines.iter().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_line(line) {
            Ok(entry) => {
                let slot = match by_name.get(&entry.product) {
                    Some(&slot) => slot,
                    None => {
                        by_name.insert(entry.product.clone(), products.len());
                        products.push(ProductAggregate {
                            product: entry.product.clone(),
                            entries: Vec::new(),
                        });
                        products.len() - 1
                    }
                };
                products[slot].entries.push(entry);
            }
            Err(kind) => errors.push(LineError {
                line: i + 1,
                text: line.to_string(),
                kind,
            }),
        }
    }

    if errors.is_empty() {
        Ok(ParseOutcome::Success { products })
    } else {
        Ok(ParseOutcome::Error {
            errors_by_line: errors,
        })
    }
}
