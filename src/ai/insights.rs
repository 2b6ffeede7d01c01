//! Spending summary. A deterministic arithmetic report, not a model call.

use crate::transactions::repo::Transaction;

const NO_DATA_MESSAGE: &str = "No transactions yet to analyze.";
const DISCLAIMER: &str = "AI narrative insights are currently disabled.";

pub fn summarize(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return NO_DATA_MESSAGE.to_string();
    }

    let income: f64 = transactions
        .iter()
        .filter(|t| t.kind == "income")
        .map(|t| t.amount)
        .sum();
    let expense: f64 = transactions
        .iter()
        .filter(|t| t.kind == "expense")
        .map(|t| t.amount)
        .sum();
    let balance = income - expense;

    format!("Income: ₹{income}, Expenses: ₹{expense}, Balance: ₹{balance}. {DISCLAIMER}")
}
