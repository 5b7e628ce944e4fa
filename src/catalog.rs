//! Fund companies and their products, grouped by client book.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::logging::{log, obj, v_str, Domain, Level};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundProduct {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundCompany {
    pub name: String,
    pub products: Vec<FundProduct>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogClient {
    pub name: String,
    pub companies: Vec<FundCompany>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FundCatalog {
    pub clients: Vec<CatalogClient>,
}

impl FundCatalog {
    /// Load a catalog from a JSON array of clients.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading fund catalog {}", path.display()))?;
        let catalog: FundCatalog = serde_json::from_str(&raw)
            .with_context(|| format!("parsing fund catalog {}", path.display()))?;
        log(
            Level::Info,
            Domain::Catalog,
            "catalog.loaded",
            obj(&[
                ("path", v_str(&path.to_string_lossy())),
                ("companies", serde_json::json!(catalog.companies().len())),
            ]),
        );
        Ok(catalog)
    }

    /// Configured catalog file, or the built-in one.
    pub fn from_path_or_builtin(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => Self::load(Path::new(p)),
            None => Ok(Self::builtin()),
        }
    }

    /// Distinct company names, sorted.
    pub fn companies(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self
            .clients
            .iter()
            .flat_map(|c| c.companies.iter().map(|co| co.name.as_str()))
            .collect();
        set.into_iter().collect()
    }

    /// Products of the first company with exactly this name.
    pub fn products_for(&self, company: &str) -> &[FundProduct] {
        self.clients
            .iter()
            .flat_map(|c| c.companies.iter())
            .find(|co| co.name == company)
            .map(|co| co.products.as_slice())
            .unwrap_or(&[])
    }

    pub fn product(&self, company: &str, product_name: &str) -> Option<&FundProduct> {
        self.products_for(company).iter().find(|p| p.name == product_name)
    }

    pub fn builtin() -> Self {
        fn company(name: &str, products: &[(&str, &str)]) -> FundCompany {
            FundCompany {
                name: name.to_string(),
                products: products
                    .iter()
                    .map(|(code, name)| FundProduct {
                        code: code.to_string(),
                        name: name.to_string(),
                    })
                    .collect(),
            }
        }

        Self {
            clients: vec![
                CatalogClient {
                    name: "Smith Family Trust".to_string(),
                    companies: vec![
                        company(
                            "AGF Investments",
                            &[("AGF9001", "AGF Balanced Fund"), ("AGF9011", "AGF Global Equity Fund")],
                        ),
                        company(
                            "TD Asset Management",
                            &[("TDB161", "TD Canadian Equity Fund"), ("TDB622", "TD Monthly Income Fund")],
                        ),
                    ],
                },
                CatalogClient {
                    name: "Williams Education Savings".to_string(),
                    companies: vec![
                        company(
                            "RBC Global Asset Management",
                            &[("RBF1250", "RBC Global Bond Fund"), ("RBF556", "RBC Select Balanced Portfolio")],
                        ),
                        company("Mackenzie Investments", &[("MFC4412", "Mackenzie Growth Fund")]),
                        company("AGF Investments", &[("AGF9001", "AGF Balanced Fund")]),
                    ],
                },
                CatalogClient {
                    name: "Brown Family Trust".to_string(),
                    companies: vec![
                        company(
                            "CIBC Asset Management",
                            &[("CIB583", "CIBC Dividend Fund"), ("CIB880", "CIBC Global Equity Fund")],
                        ),
                        company(
                            "Fidelity Investments",
                            &[("FID281", "Fidelity Canadian Fund"), ("FID5494", "Fidelity Growth Fund")],
                        ),
                    ],
                },
            ],
        }
    }
}

/// Fund company / product picks on the order ticket.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProductSelection {
    company: Option<String>,
    product: Option<String>,
}

impl ProductSelection {
    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    pub fn product(&self) -> Option<&str> {
        self.product.as_deref()
    }

    /// Picking the current company again clears it. Either way the product
    /// selection is reset.
    pub fn select_company(&mut self, company: &str) {
        if self.company.as_deref() == Some(company) {
            self.company = None;
        } else {
            self.company = Some(company.to_string());
        }
        self.product = None;
        log(
            Level::Debug,
            Domain::Catalog,
            "catalog.company",
            obj(&[("company", v_str(self.company.as_deref().unwrap_or("")))]),
        );
    }

    /// Picking the current product again clears it. Ignored until a company
    /// is chosen.
    pub fn select_product(&mut self, product: &str) {
        if self.company.is_none() {
            return;
        }
        if self.product.as_deref() == Some(product) {
            self.product = None;
        } else {
            self.product = Some(product.to_string());
        }
    }

    /// Products offered for the chosen company.
    pub fn offered<'a>(&self, catalog: &'a FundCatalog) -> &'a [FundProduct] {
        match &self.company {
            Some(c) => catalog.products_for(c),
            None => &[],
        }
    }

    pub fn clear(&mut self) {
        self.company = None;
        self.product = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_companies_sorted_and_unique() {
        let cat = FundCatalog::builtin();
        let companies = cat.companies();
        assert_eq!(companies.iter().filter(|c| **c == "AGF Investments").count(), 1);
        let mut sorted = companies.clone();
        sorted.sort();
        assert_eq!(companies, sorted);
    }

    #[test]
    fn test_products_first_match_wins() {
        let cat = FundCatalog::builtin();
        assert_eq!(cat.products_for("AGF Investments").len(), 2);
        assert!(cat.products_for("agf investments").is_empty());
        assert_eq!(cat.product("AGF Investments", "AGF Balanced Fund").unwrap().code, "AGF9001");
    }

    #[test]
    fn test_company_toggle_resets_product() {
        let mut sel = ProductSelection::default();
        sel.select_product("ignored");
        assert_eq!(sel.product(), None);
        sel.select_company("AGF Investments");
        sel.select_product("AGF Balanced Fund");
        sel.select_company("AGF Investments");
        assert_eq!(sel.company(), None);
        assert_eq!(sel.product(), None);
    }
}
