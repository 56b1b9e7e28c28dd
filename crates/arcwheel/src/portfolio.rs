//! Investment records as supplied by the portfolio data layer.

use crate::label::initials;
use crate::layout::{AllocationItem, ItemId};
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct PropertyId(String);

crate::impl_string_newtype!(PropertyId);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub id: ItemId,
    pub current_value: f64,
    pub property: Property,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Portfolio {
    #[serde(default)]
    pub investments: Vec<Investment>,
    /// Display aggregate; summed from the investments when absent.
    pub total_value: Option<f64>,
    pub total_invested: Option<f64>,
}

#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("Portfolio file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Portfolio error: {0}")]
    Config(#[from] config::ConfigError),
}

impl Portfolio {
    /// Reads a portfolio file; the format follows the file extension.
    pub fn load(path: &Path) -> Result<Self, PortfolioError> {
        if !path.exists() {
            return Err(PortfolioError::NotFound(path.to_path_buf()));
        }

        let s = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?;

        Ok(s.try_deserialize()?)
    }

    pub fn allocation_items(&self) -> Vec<AllocationItem> {
        self.investments
            .iter()
            .map(|inv| AllocationItem {
                id: inv.id.clone(),
                value: inv.current_value,
                label: initials(&inv.property.title),
            })
            .collect()
    }

    pub fn property_for(&self, id: &ItemId) -> Option<&Property> {
        self.investments
            .iter()
            .find(|inv| &inv.id == id)
            .map(|inv| &inv.property)
    }

    pub fn total_value(&self) -> f64 {
        self.total_value
            .unwrap_or_else(|| self.investments.iter().map(|i| i.current_value).sum())
    }

    pub fn total_invested(&self) -> f64 {
        self.total_invested.unwrap_or_else(|| self.total_value())
    }

    /// Unrealised gain relative to the invested amount, in percent.
    pub fn gain_percent(&self) -> Option<f64> {
        let invested = self.total_invested();
        (invested > 0.0).then(|| (self.total_value() - invested) / invested * 100.0)
    }
}
