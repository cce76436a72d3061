//! Catalog of supported API methods
//!
//! The catalog is fixed: each method is either public (market data, no
//! credentials) or private (account and trading, signed).

use crate::error::RestError;
use std::fmt;
use std::str::FromStr;

/// Whether a method needs authentication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    /// Path segment used in the request URL
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

/// Kraken REST API method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    // === Public (market data) ===
    Time,
    Assets,
    AssetPairs,
    Ticker,
    Depth,
    Trades,
    Spread,
    Ohlc,

    // === Private (account) ===
    Balance,
    TradeBalance,
    OpenOrders,
    ClosedOrders,
    QueryOrders,
    TradesHistory,
    QueryTrades,
    OpenPositions,
    Ledgers,
    QueryLedgers,
    TradeVolume,

    // === Private (trading) ===
    AddOrder,
    CancelOrder,

    // === Private (funding) ===
    DepositMethods,
    DepositAddresses,
    DepositStatus,
    WithdrawInfo,
    Withdraw,
    WithdrawStatus,
    WithdrawCancel,
}

impl Method {
    /// Methods callable without credentials
    pub const PUBLIC: [Method; 8] = [
        Method::Time,
        Method::Assets,
        Method::AssetPairs,
        Method::Ticker,
        Method::Depth,
        Method::Trades,
        Method::Spread,
        Method::Ohlc,
    ];

    /// Methods that require a signed request
    pub const PRIVATE: [Method; 20] = [
        Method::Balance,
        Method::TradeBalance,
        Method::OpenOrders,
        Method::ClosedOrders,
        Method::QueryOrders,
        Method::TradesHistory,
        Method::QueryTrades,
        Method::OpenPositions,
        Method::Ledgers,
        Method::QueryLedgers,
        Method::TradeVolume,
        Method::AddOrder,
        Method::CancelOrder,
        Method::DepositMethods,
        Method::DepositAddresses,
        Method::DepositStatus,
        Method::WithdrawInfo,
        Method::Withdraw,
        Method::WithdrawStatus,
        Method::WithdrawCancel,
    ];

    /// Name as it appears in the request path
    pub fn name(&self) -> &'static str {
        match self {
            Self::Time => "Time",
            Self::Assets => "Assets",
            Self::AssetPairs => "AssetPairs",
            Self::Ticker => "Ticker",
            Self::Depth => "Depth",
            Self::Trades => "Trades",
            Self::Spread => "Spread",
            Self::Ohlc => "OHLC",
            Self::Balance => "Balance",
            Self::TradeBalance => "TradeBalance",
            Self::OpenOrders => "OpenOrders",
            Self::ClosedOrders => "ClosedOrders",
            Self::QueryOrders => "QueryOrders",
            Self::TradesHistory => "TradesHistory",
            Self::QueryTrades => "QueryTrades",
            Self::OpenPositions => "OpenPositions",
            Self::Ledgers => "Ledgers",
            Self::QueryLedgers => "QueryLedgers",
            Self::TradeVolume => "TradeVolume",
            Self::AddOrder => "AddOrder",
            Self::CancelOrder => "CancelOrder",
            Self::DepositMethods => "DepositMethods",
            Self::DepositAddresses => "DepositAddresses",
            Self::DepositStatus => "DepositStatus",
            Self::WithdrawInfo => "WithdrawInfo",
            Self::Withdraw => "Withdraw",
            Self::WithdrawStatus => "WithdrawStatus",
            Self::WithdrawCancel => "WithdrawCancel",
        }
    }

    pub fn visibility(&self) -> Visibility {
        if Self::PUBLIC.contains(self) {
            Visibility::Public
        } else {
            Visibility::Private
        }
    }

    pub fn is_private(&self) -> bool {
        self.visibility() == Visibility::Private
    }

    /// Look up a method by its exact (case-sensitive) name
    pub fn lookup(name: &str) -> Option<Method> {
        Self::PUBLIC
            .iter()
            .chain(Self::PRIVATE.iter())
            .find(|m| m.name() == name)
            .copied()
    }
}

impl FromStr for Method {
    type Err = RestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::lookup(s).ok_or_else(|| RestError::InvalidMethod(s.to_string()))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
