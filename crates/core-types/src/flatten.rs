use crate::enums::SourceType;
use crate::structs::{CurrencyRates, Holding, PortfolioSnapshot};

/// Symbol used for manual assets that have no currency set.
pub const UNKNOWN_CURRENCY_SYMBOL: &str = "OTHER";

/// Merges exchange, wallet and manual holdings into one list.
///
/// Exchange and wallet holdings are attributed to their account name. Each manual
/// asset becomes a single holding keyed by its currency, valued in USD.
pub fn flatten_holdings(snapshot: &PortfolioSnapshot, rates: &CurrencyRates) -> Vec<Holding> {
    let mut holdings = flatten_crypto_holdings(snapshot);

    for asset in &snapshot.manual_assets {
        let symbol = if asset.currency.trim().is_empty() {
            UNKNOWN_CURRENCY_SYMBOL.to_string()
        } else {
            asset.currency.clone()
        };
        holdings.push(Holding::new(
            symbol,
            asset.usd_value(rates),
            asset.name.clone(),
            SourceType::Manual,
        ));
    }

    tracing::debug!(count = holdings.len(), "Flattened portfolio holdings.");
    holdings
}

/// Exchange and wallet holdings only.
pub fn flatten_crypto_holdings(snapshot: &PortfolioSnapshot) -> Vec<Holding> {
    let cex = snapshot.cex_accounts.iter().flat_map(|account| {
        account.holdings.iter().map(move |h| {
            Holding::new(h.symbol.clone(), h.value, account.name.clone(), SourceType::Cex)
        })
    });
    let wallets = snapshot.wallet_addresses.iter().flat_map(|wallet| {
        wallet.holdings.iter().map(move |h| {
            Holding::new(
                h.symbol.clone(),
                h.value,
                wallet.name.clone(),
                SourceType::Blockchain,
            )
        })
    });

    cex.chain(wallets).collect()
}
