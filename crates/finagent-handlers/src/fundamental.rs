use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use finagent_models::invocation::{BodyStyle, InvocationEnvelope};
use finagent_sources::{FinancialDatasetsClient, StatementKind};

use crate::dispatch::ToolHandler;
use crate::error::HandlerError;
use crate::params;

/// Functions served by the fundamental handler, one per statement type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FundamentalFunction {
    IncomeStatements,
    BalanceSheets,
    CashFlowStatements,
}

impl FundamentalFunction {
    pub const ALL: [FundamentalFunction; 3] = [
        FundamentalFunction::IncomeStatements,
        FundamentalFunction::BalanceSheets,
        FundamentalFunction::CashFlowStatements,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FundamentalFunction::IncomeStatements => "get_income_statements",
            FundamentalFunction::BalanceSheets => "get_balance_sheets",
            FundamentalFunction::CashFlowStatements => "get_cash_flow_statements",
        }
    }

    pub fn statement(&self) -> StatementKind {
        match self {
            FundamentalFunction::IncomeStatements => StatementKind::Income,
            FundamentalFunction::BalanceSheets => StatementKind::BalanceSheet,
            FundamentalFunction::CashFlowStatements => StatementKind::CashFlow,
        }
    }
}

impl FromStr for FundamentalFunction {
    type Err = HandlerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| HandlerError::UnknownFunction(s.to_string()))
    }
}

pub struct FundamentalHandler {
    client: Arc<FinancialDatasetsClient>,
    body_style: BodyStyle,
}

impl FundamentalHandler {
    pub fn new(client: Arc<FinancialDatasetsClient>, body_style: BodyStyle) -> Self {
        Self { client, body_style }
    }
}

#[async_trait]
impl ToolHandler for FundamentalHandler {
    fn family(&self) -> &str {
        "fundamental"
    }

    fn body_style(&self) -> BodyStyle {
        self.body_style
    }

    async fn handle(
        &self,
        invocation: &InvocationEnvelope,
    ) -> Result<serde_json::Value, HandlerError> {
        let function: FundamentalFunction = invocation.function.parse()?;

        let [ticker, period, limit] = params::require(invocation, ["ticker", "period", "limit"])?;
        let limit: u32 = params::parse_positive("limit", limit)?;

        Ok(self
            .client
            .statements(function.statement(), ticker, period, limit)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_function_maps_to_its_statement() {
        let pairs: Vec<_> = FundamentalFunction::ALL
            .iter()
            .map(|f| (f.name(), f.statement().collection()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("get_income_statements", "income_statements"),
                ("get_balance_sheets", "balance_sheets"),
                ("get_cash_flow_statements", "cash_flow_statements"),
            ]
        );
    }

    #[test]
    fn unknown_function_is_rejected() {
        assert!(matches!(
            "get_stock_prices".parse::<FundamentalFunction>(),
            Err(HandlerError::UnknownFunction(_))
        ));
    }
}
