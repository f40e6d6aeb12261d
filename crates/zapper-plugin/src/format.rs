//! Response Formatting
//!
//! Turns a portfolio payload into the multi-section text report and a
//! Farcaster profile into its wallet address list. Number rendering
//! matches en-US locale output: comma grouping, two-decimal currency,
//! token quantities with up to four fractional digits.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::model::{FarcasterProfile, NetworkTotal, Portfolio, TokenBalance};

/// How many token positions the report shows
const TOP_HOLDINGS: usize = 5;

/// Insert comma separators into a bare digit string
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && i % 3 == offset % 3 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    grouped
}

/// Render a decimal with grouping and a bounded number of fractional
/// digits. Rounds half away from zero; trailing zeros are stripped down
/// to `min_fraction_digits`.
fn format_grouped(value: Decimal, max_fraction_digits: u32, min_fraction_digits: u32) -> String {
    let rounded =
        value.round_dp_with_strategy(max_fraction_digits, RoundingStrategy::MidpointAwayFromZero);

    let mut plain = format!("{:.*}", max_fraction_digits as usize, rounded);
    let negative = plain.starts_with('-');
    if negative {
        plain.remove(0);
    }

    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (plain, String::new()),
    };

    let mut frac = frac_part.trim_end_matches('0').to_string();
    while (frac.len() as u32) < min_fraction_digits {
        frac.push('0');
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(&int_part));
    if !frac.is_empty() {
        out.push('.');
        out.push_str(&frac);
    }

    out
}

/// Render a USD amount (e.g. `$1,234.57`, `-$0.50`)
pub fn format_usd(value: Decimal) -> String {
    let formatted = format_grouped(value, 2, 2);
    match formatted.strip_prefix('-') {
        Some(positive) => format!("-${positive}"),
        None => format!("${formatted}"),
    }
}

/// Render a token quantity with up to four fractional digits
pub fn format_token_amount(value: Decimal) -> String {
    format_grouped(value, 4, 0)
}

/// Split a comma-separated address list, trimming and dropping empties
pub fn parse_address_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn token_line(balance: &TokenBalance) -> String {
    format!(
        "{} ({})\nNetwork: {}\nBalance: {}\nValue: {}",
        balance.token.base_token.name,
        balance.token.base_token.symbol,
        balance.network,
        format_token_amount(balance.token.balance),
        format_usd(balance.token.balance_usd),
    )
}

/// Build the portfolio report: totals, per-network breakdown, the top
/// token positions by USD value, and every NFT balance entry.
pub fn format_portfolio(portfolio: &Portfolio) -> String {
    let mut tokens: Vec<&TokenBalance> = portfolio.token_balances.iter().collect();
    tokens.sort_by(|a, b| b.token.balance_usd.cmp(&a.token.balance_usd));

    let token_section = tokens
        .iter()
        .take(TOP_HOLDINGS)
        .map(|balance| token_line(balance))
        .collect::<Vec<_>>()
        .join("\n");

    let nft_section = portfolio
        .nft_balances
        .iter()
        .map(|nft| format!("{}\nNFT Value: {}", nft.network, format_usd(nft.balance_usd)))
        .collect::<Vec<_>>()
        .join("\n");

    let mut networks: Vec<&NetworkTotal> = portfolio
        .totals
        .total_by_network
        .iter()
        .filter(|net| net.total > Decimal::ZERO)
        .collect();
    networks.sort_by(|a, b| b.total.cmp(&a.total));

    let network_totals = networks
        .iter()
        .map(|net| format!("{}: {}", net.network, format_usd(net.total)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "\u{1F4B0} Portfolio Summary:\n\
         Total Value (excluding NFTs): {}\n\
         Total Value (including NFTs): {}\n        \n\
         \u{1F310} Network Breakdown:\n{}\n        \n\
         \u{1FA99} Top Token Holdings:\n{}\n        \n\
         \u{1F3A8} NFT Holdings:\n{}",
        format_usd(portfolio.totals.total),
        format_usd(portfolio.totals.total_with_nft),
        network_totals,
        token_section,
        nft_section,
    )
}

/// Collect wallet addresses from a Farcaster profile: connected addresses
/// first, custody address last, empty entries removed. An absent profile
/// yields an empty list, not an error.
pub fn wallet_addresses(profile: Option<&FarcasterProfile>) -> Vec<String> {
    let Some(profile) = profile else {
        return Vec::new();
    };

    profile
        .connected_addresses
        .iter()
        .cloned()
        .chain(profile.custody_address.clone())
        .filter(|addr| !addr.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BaseToken, NftBalance, TokenHolding, Totals};
    use rust_decimal_macros::dec;

    fn token_balance(name: &str, symbol: &str, network: &str, balance: Decimal, usd: Decimal) -> TokenBalance {
        TokenBalance {
            address: None,
            network: network.into(),
            token: TokenHolding {
                balance,
                balance_usd: usd,
                base_token: BaseToken {
                    name: name.into(),
                    symbol: symbol.into(),
                },
            },
        }
    }

    fn portfolio_with(tokens: Vec<TokenBalance>, nfts: Vec<NftBalance>, totals: Totals) -> Portfolio {
        Portfolio {
            token_balances: tokens,
            nft_balances: nfts,
            totals,
        }
    }

    fn totals(total: Decimal, with_nft: Decimal, by_network: Vec<(&str, Decimal)>) -> Totals {
        Totals {
            total,
            total_with_nft: with_nft,
            total_by_network: by_network
                .into_iter()
                .map(|(network, total)| NetworkTotal {
                    network: network.into(),
                    total,
                })
                .collect(),
            holdings: Vec::new(),
        }
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(dec!(100)), "$100.00");
        assert_eq!(format_usd(dec!(1234.5)), "$1,234.50");
        assert_eq!(format_usd(dec!(1234567.891)), "$1,234,567.89");
        assert_eq!(format_usd(dec!(0.005)), "$0.01");
        assert_eq!(format_usd(dec!(-42.4)), "-$42.40");
    }

    #[test]
    fn test_format_token_amount() {
        assert_eq!(format_token_amount(dec!(1234.56789)), "1,234.5679");
        assert_eq!(format_token_amount(dec!(100.0000)), "100");
        assert_eq!(format_token_amount(dec!(0.5)), "0.5");
        assert_eq!(format_token_amount(dec!(12345)), "12,345");
    }

    #[test]
    fn test_parse_address_list() {
        assert_eq!(parse_address_list("0x1, 0x2 ,"), vec!["0x1", "0x2"]);
        assert!(parse_address_list("  ,  , ").is_empty());
        assert_eq!(parse_address_list("0xABC"), vec!["0xABC"]);
    }

    #[test]
    fn test_top_holdings_capped_at_five_sorted_descending() {
        let tokens = (1..=7)
            .map(|i| {
                token_balance(
                    &format!("Token{i}"),
                    &format!("T{i}"),
                    "ethereum",
                    dec!(1),
                    Decimal::from(i * 100),
                )
            })
            .collect();
        let portfolio = portfolio_with(tokens, Vec::new(), totals(dec!(2800), dec!(2800), vec![]));

        let report = format_portfolio(&portfolio);
        let section = report.split("Top Token Holdings:").nth(1).unwrap();

        let entries: Vec<_> = section.matches("Value: $").collect();
        assert_eq!(entries.len(), 5);

        // Highest value first, sixth and seventh dropped
        assert!(section.contains("Token7 (T7)"));
        assert!(section.find("Token7").unwrap() < section.find("Token3").unwrap());
        assert!(!section.contains("Token2 (T2)"));
        assert!(!section.contains("Token1 (T1)"));
    }

    #[test]
    fn test_fewer_than_five_tokens_renders_all() {
        let tokens = vec![
            token_balance("Ethereum", "ETH", "ethereum", dec!(1.5), dec!(4500)),
            token_balance("USD Coin", "USDC", "base", dec!(250), dec!(250)),
        ];
        let portfolio = portfolio_with(tokens, Vec::new(), totals(dec!(4750), dec!(4750), vec![]));

        let report = format_portfolio(&portfolio);
        assert!(report.contains("Ethereum (ETH)"));
        assert!(report.contains("USD Coin (USDC)"));
        assert!(report.contains("Balance: 1.5"));
        assert!(report.contains("Balance: 250"));
    }

    #[test]
    fn test_network_breakdown_filters_and_sorts() {
        let portfolio = portfolio_with(
            Vec::new(),
            Vec::new(),
            totals(
                dec!(100),
                dec!(100),
                vec![
                    ("ethereum", dec!(10)),
                    ("base", dec!(60)),
                    ("polygon", dec!(0)),
                    ("optimism", dec!(-5)),
                ],
            ),
        );

        let report = format_portfolio(&portfolio);
        let section = report
            .split("Network Breakdown:")
            .nth(1)
            .unwrap()
            .split("Top Token Holdings:")
            .next()
            .unwrap();

        assert!(section.contains("base: $60.00"));
        assert!(section.contains("ethereum: $10.00"));
        assert!(!section.contains("polygon"));
        assert!(!section.contains("optimism"));
        assert!(section.find("base").unwrap() < section.find("ethereum").unwrap());
    }

    #[test]
    fn test_empty_nft_list_renders_empty_section() {
        let portfolio = portfolio_with(Vec::new(), Vec::new(), totals(dec!(0), dec!(0), vec![]));

        let report = format_portfolio(&portfolio);
        assert!(report.ends_with("\u{1F3A8} NFT Holdings:\n"));
    }

    #[test]
    fn test_nft_entries_rendered_without_truncation() {
        let nfts = vec![
            NftBalance {
                network: "ethereum".into(),
                balance_usd: dec!(1500),
            },
            NftBalance {
                network: "base".into(),
                balance_usd: dec!(25.5),
            },
        ];
        let portfolio = portfolio_with(Vec::new(), nfts, totals(dec!(0), dec!(1525.5), vec![]));

        let report = format_portfolio(&portfolio);
        assert!(report.contains("ethereum\nNFT Value: $1,500.00"));
        assert!(report.contains("base\nNFT Value: $25.50"));
    }

    #[test]
    fn test_single_token_report_totals() {
        let tokens = vec![token_balance("Test", "TST", "ethereum", dec!(10), dec!(100))];
        let portfolio = portfolio_with(
            tokens,
            Vec::new(),
            totals(dec!(100), dec!(100), vec![("ethereum", dec!(100))]),
        );

        let report = format_portfolio(&portfolio);
        assert!(report.contains("Total Value (excluding NFTs): $100.00"));
        assert!(report.contains("Total Value (including NFTs): $100.00"));
        assert!(report.contains("Test (TST)\nNetwork: ethereum\nBalance: 10\nValue: $100.00"));
    }

    #[test]
    fn test_wallet_addresses_order_and_filtering() {
        let profile = FarcasterProfile {
            username: Some("dwr.eth".into()),
            fid: Some(3),
            metadata: None,
            connected_addresses: vec!["0xA".into(), "0xB".into(), String::new()],
            custody_address: Some("0xC".into()),
        };

        assert_eq!(wallet_addresses(Some(&profile)), vec!["0xA", "0xB", "0xC"]);
    }

    #[test]
    fn test_wallet_addresses_absent_profile() {
        assert!(wallet_addresses(None).is_empty());
    }

    #[test]
    fn test_wallet_addresses_custody_only() {
        let profile = FarcasterProfile {
            username: None,
            fid: None,
            metadata: None,
            connected_addresses: Vec::new(),
            custody_address: Some("0xC".into()),
        };

        assert_eq!(wallet_addresses(Some(&profile)), vec!["0xC"]);
    }
}
