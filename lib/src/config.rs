//! Graph configuration: capabilities, maintained index orders and
//! transaction support. Persisted as JSON.

use std::io::{BufReader, Write};
use std::path::Path;

use anyhow::Result;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::capabilities::Capabilities;
use crate::index::IndexOrder;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Builder)]
#[builder(default, setter(into), build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct GraphConfig {
    /// Label used in log lines.
    pub name: String,
    pub capabilities: Capabilities,
    /// SPO is always maintained; listing it is optional.
    pub index_orders: Vec<IndexOrder>,
    /// When false, begin/commit/abort do nothing.
    pub transactions: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            name: "graph".to_string(),
            capabilities: Capabilities::default(),
            index_orders: IndexOrder::ALL.to_vec(),
            transactions: true,
        }
    }
}

impl GraphConfigBuilder {
    fn validate(&self) -> std::result::Result<(), String> {
        if let Some(orders) = &self.index_orders {
            let mut seen = Vec::new();
            for order in orders {
                if seen.contains(order) {
                    return Err(format!("index order {} listed twice", order));
                }
                seen.push(*order);
            }
        }
        if let Some(name) = &self.name {
            if name.is_empty() {
                return Err("graph name must not be empty".to_string());
            }
        }
        Ok(())
    }
}

impl GraphConfig {
    pub fn builder() -> GraphConfigBuilder {
        GraphConfigBuilder::default()
    }

    pub fn save_to_file(&self, file: &Path) -> Result<()> {
        let config_str = serde_json::to_string_pretty(&self)?;
        let mut file = std::fs::File::create(file)?;
        file.write_all(config_str.as_bytes())?;
        Ok(())
    }

    pub fn from_file(file: &Path) -> Result<Self> {
        let file = std::fs::File::open(file)?;
        let reader = BufReader::new(file);
        let config: GraphConfig = serde_json::from_reader(reader)?;
        Ok(config)
    }
}
