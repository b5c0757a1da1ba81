use bolso_core::{Money, TransactionKind, TransactionRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::statement::StatementEntry;

/// One entry of the decision list: matches when the upper-cased description
/// contains any of the keywords and, if `kind` is set, the record kind
/// equals it. Rules are evaluated top to bottom and the first match wins,
/// so the order of the list is part of its meaning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub category: String,
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
}

/// What to do when no rule matches. Thresholds are in whole currency units
/// and compared strictly (`amount > threshold`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackPolicy {
    pub income_threshold: i64,
    pub income_above: String,
    pub income_below: String,
    pub expense_threshold: i64,
    pub expense_above: String,
    pub expense_below: String,
}

/// The full classifier configuration: ordered rules plus the fallback.
/// Loaded once (built-in defaults or a TOML file) and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSet {
    pub rules: Vec<Rule>,
    pub fallback: FallbackPolicy,
}

#[derive(Error, Debug)]
pub enum RulesError {
    #[error("failed to parse rules file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl RuleSet {
    pub fn from_toml(content: &str) -> Result<Self, RulesError> {
        Ok(toml::from_str(content)?)
    }
}

fn rule(category: &str, keywords: &[&str]) -> Rule {
    Rule {
        category: category.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        kind: None,
    }
}

fn kind_rule(category: &str, keywords: &[&str], kind: TransactionKind) -> Rule {
    Rule {
        kind: Some(kind),
        ..rule(category, keywords)
    }
}

impl Default for RuleSet {
    /// The production rule table. Keyword lists are data: new merchants go
    /// here (or in the TOML override), never in the matching code. Rules 11
    /// and 12 both map to "Alimentação" through different vocabularies and
    /// must stay separate entries, or their precedence against
    /// "Compras/Variedades" silently changes.
    fn default() -> Self {
        RuleSet {
            rules: vec![
                rule("Investimentos", &["CDB", "APLICACAO", "RESGATE", "PORQUINHO"]),
                rule("Cartão de Crédito", &["FATURA"]),
                kind_rule(
                    "Salário/Renda",
                    &["SALARIO", "FOLHA DE PAGAMENTO", "PROVENTOS", "PRO LABORE"],
                    TransactionKind::Income,
                ),
                kind_rule(
                    "Contas/Telefonia/Impostos",
                    &["MARIA APARECIDA", "JOSE CARLOS BATISTA"],
                    TransactionKind::Expense,
                ),
                rule(
                    "Contas/Telefonia/Impostos",
                    &["VIVO", "CLARO", "ENEL", "SABESP", "DARF", "IPTU", "IPVA"],
                ),
                rule(
                    "Farmácia/Saúde",
                    &["DROGARIA", "DROGASIL", "FARMACIA", "PANVEL"],
                ),
                rule("Transporte/App", &["UBER", "99APP", "99 POP"]),
                rule("Combustível", &["POSTO", "IPIRANGA", "SHELL", "BR PETROBRAS"]),
                rule("Cerveja/Rolê", &["BOTECO", "CERVEJARIA", "CHOPP", "BAR DO"]),
                rule("Tabaco", &["TABACARIA", "CHARUTARIA"]),
                rule(
                    "Alimentação",
                    &[
                        "SUPERMERCADO",
                        "MERCADINHO",
                        "ATACADAO",
                        "CARREFOUR",
                        "PAO DE ACUCAR",
                        "PADARIA",
                        "HORTIFRUTI",
                    ],
                ),
                rule(
                    "Alimentação",
                    &[
                        "IFOOD",
                        "RESTAURANTE",
                        "LANCHONETE",
                        "MCDONALDS",
                        "BURGER KING",
                        "HABIBS",
                    ],
                ),
                rule(
                    "Compras/Variedades",
                    &[
                        "MAGAZINE LUIZA",
                        "AMERICANAS",
                        "SHOPEE",
                        "AMAZON",
                        "LOJAS RENNER",
                        "HAVAN",
                    ],
                ),
            ],
            fallback: FallbackPolicy {
                income_threshold: 800,
                income_above: "Salário/Renda".to_string(),
                income_below: "Reembolso".to_string(),
                expense_threshold: 100,
                expense_above: "Pix/Transferência".to_string(),
                expense_below: "Consumo Diversos".to_string(),
            },
        }
    }
}

/// First-match-wins decision list over a [`RuleSet`]. Pure and total:
/// every `(description, amount, kind)` maps to exactly one category, the
/// fallback guaranteeing a label when no rule fires.
pub struct Classifier {
    rules: Vec<Rule>,
    fallback: FallbackPolicy,
    income_threshold: Money,
    expense_threshold: Money,
}

impl Classifier {
    pub fn new(rule_set: RuleSet) -> Self {
        // Keywords are upper-cased once here; classify only normalizes
        // the description.
        let rules = rule_set
            .rules
            .into_iter()
            .map(|r| Rule {
                keywords: r.keywords.iter().map(|k| k.to_uppercase()).collect(),
                ..r
            })
            .collect();
        let income_threshold =
            Money::from_decimal(Decimal::from(rule_set.fallback.income_threshold));
        let expense_threshold =
            Money::from_decimal(Decimal::from(rule_set.fallback.expense_threshold));
        Self {
            rules,
            fallback: rule_set.fallback,
            income_threshold,
            expense_threshold,
        }
    }

    pub fn classify(&self, description: &str, amount: Money, kind: TransactionKind) -> String {
        let haystack = description.to_uppercase();

        for rule in &self.rules {
            if let Some(required) = rule.kind {
                if required != kind {
                    continue;
                }
            }
            if rule.keywords.iter().any(|k| haystack.contains(k.as_str())) {
                return rule.category.clone();
            }
        }

        match kind {
            TransactionKind::Income => {
                if amount > self.income_threshold {
                    self.fallback.income_above.clone()
                } else {
                    self.fallback.income_below.clone()
                }
            }
            TransactionKind::Expense => {
                if amount > self.expense_threshold {
                    self.fallback.expense_above.clone()
                } else {
                    self.fallback.expense_below.clone()
                }
            }
        }
    }

    pub fn classify_entry(&self, entry: StatementEntry) -> TransactionRecord {
        let category = self.classify(&entry.description, entry.amount, entry.kind);
        TransactionRecord {
            date: entry.date,
            description: entry.description,
            amount: entry.amount,
            kind: entry.kind,
            category,
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier::new(RuleSet::default())
    }
}
