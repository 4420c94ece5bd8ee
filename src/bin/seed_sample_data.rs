//! Seed the record store with realistic sample funds, so the API and the
//! indexing pipeline can be exercised without a scraper run.

use std::collections::BTreeMap;

use chrono::Utc;

use fundassist_backend::core::config::AppPaths;
use fundassist_backend::storage::{FaqRecord, FundStore, FundUpsert, HoldingRecord};

fn sample_funds(scraped_at: &str) -> Vec<FundUpsert> {
    vec![
        FundUpsert {
            fund_name: "HDFC Mid Cap Opportunities Fund - Direct Plan - Growth".to_string(),
            source_url:
                "https://www.moneycontrol.com/mutual-funds/nav/hdfc-mid-cap-opportunities-fund/MHD068"
                    .to_string(),
            expense_ratio: Some("0.75%".to_string()),
            exit_load: Some("1% if redeemed within 1 year".to_string()),
            minimum_sip: Some("₹500".to_string()),
            minimum_lumpsum: Some("₹5000".to_string()),
            fund_manager: Some("Chirag Setalvad".to_string()),
            benchmark: Some("Nifty Midcap 150 TRI".to_string()),
            riskometer: Some("Very High".to_string()),
            nav: Some("₹145.32".to_string()),
            aum: Some("₹45,234 Cr".to_string()),
            scraped_at: Some(scraped_at.to_string()),
            returns: BTreeMap::from([
                ("1Y".to_string(), "28.5%".to_string()),
                ("3Y".to_string(), "24.3%".to_string()),
                ("5Y".to_string(), "22.1%".to_string()),
            ]),
            holdings: vec![
                HoldingRecord {
                    holding_name: "Infosys Ltd".to_string(),
                    allocation: Some("4.2%".to_string()),
                    sector: Some("Technology".to_string()),
                },
                HoldingRecord {
                    holding_name: "ICICI Bank Ltd".to_string(),
                    allocation: Some("3.8%".to_string()),
                    sector: Some("Banking".to_string()),
                },
                HoldingRecord {
                    holding_name: "Bajaj Finance Ltd".to_string(),
                    allocation: Some("3.5%".to_string()),
                    sector: Some("Financial Services".to_string()),
                },
            ],
            faqs: vec![
                FaqRecord {
                    question: "What is the minimum SIP amount for this fund?".to_string(),
                    answer: "The minimum SIP amount is ₹500 per month.".to_string(),
                },
                FaqRecord {
                    question: "What is the expense ratio?".to_string(),
                    answer: "The expense ratio for the direct plan is 0.75%.".to_string(),
                },
            ],
            ..Default::default()
        },
        FundUpsert {
            fund_name: "HDFC Top 100 Fund - Direct Plan - Growth".to_string(),
            source_url:
                "https://www.moneycontrol.com/mutual-funds/nav/hdfc-large-cap-fund-growth/MZU009"
                    .to_string(),
            expense_ratio: Some("0.65%".to_string()),
            exit_load: Some("1% if redeemed within 1 year".to_string()),
            minimum_sip: Some("₹500".to_string()),
            minimum_lumpsum: Some("₹5000".to_string()),
            fund_manager: Some("Rahul Baijal".to_string()),
            benchmark: Some("Nifty 100 TRI".to_string()),
            riskometer: Some("High".to_string()),
            nav: Some("₹892.15".to_string()),
            aum: Some("₹28,456 Cr".to_string()),
            scraped_at: Some(scraped_at.to_string()),
            returns: BTreeMap::from([
                ("1Y".to_string(), "18.2%".to_string()),
                ("3Y".to_string(), "16.8%".to_string()),
                ("5Y".to_string(), "15.4%".to_string()),
            ]),
            holdings: vec![
                HoldingRecord {
                    holding_name: "HDFC Bank Ltd".to_string(),
                    allocation: Some("9.1%".to_string()),
                    sector: Some("Banking".to_string()),
                },
                HoldingRecord {
                    holding_name: "Reliance Industries".to_string(),
                    allocation: Some("7.4%".to_string()),
                    sector: Some("Energy".to_string()),
                },
            ],
            faqs: vec![
                FaqRecord {
                    question: "Is this fund suitable for conservative investors?".to_string(),
                    answer: "It invests in large-cap stocks, making it relatively stable, but \
                             equity risk remains."
                        .to_string(),
                },
            ],
            ..Default::default()
        },
        FundUpsert {
            fund_name: "HDFC Small Cap Fund - Direct Plan - Growth".to_string(),
            source_url:
                "https://www.moneycontrol.com/mutual-funds/nav/hdfc-small-cap-fund-direct-plan/MMS025"
                    .to_string(),
            expense_ratio: Some("0.82%".to_string()),
            exit_load: Some("1% if redeemed within 1 year".to_string()),
            minimum_sip: Some("₹500".to_string()),
            minimum_lumpsum: Some("₹5000".to_string()),
            fund_manager: Some("Chirag Setalvad".to_string()),
            benchmark: Some("Nifty Smallcap 250 TRI".to_string()),
            riskometer: Some("Very High".to_string()),
            nav: Some("₹118.76".to_string()),
            aum: Some("₹31,120 Cr".to_string()),
            scraped_at: Some(scraped_at.to_string()),
            returns: BTreeMap::from([
                ("1Y".to_string(), "32.1%".to_string()),
                ("3Y".to_string(), "27.6%".to_string()),
                ("5Y".to_string(), "25.0%".to_string()),
            ]),
            holdings: vec![
                HoldingRecord {
                    holding_name: "Firstsource Solutions".to_string(),
                    allocation: Some("5.6%".to_string()),
                    sector: Some("IT Services".to_string()),
                },
            ],
            faqs: vec![
                FaqRecord {
                    question: "What is the lock-in period?".to_string(),
                    answer: "There is no lock-in period, but an exit load applies within 1 year."
                        .to_string(),
                },
            ],
            ..Default::default()
        },
    ]
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let paths = AppPaths::new();
    let store = FundStore::new(&paths).await?;

    let scraped_at = Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
    for fund in sample_funds(&scraped_at) {
        let fund_id = store.save_fund(&fund).await?;
        println!("Saved {} (id {fund_id})", fund.fund_name);
    }

    let stats = store.stats().await?;
    println!(
        "Record store now holds {} funds, {} returns, {} holdings, {} FAQs",
        stats.funds, stats.returns, stats.holdings, stats.faqs
    );
    println!("Database: {}", paths.db_path.display());

    Ok(())
}
