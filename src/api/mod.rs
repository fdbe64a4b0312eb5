pub mod blockchaincenter;
pub mod coingecko;
pub mod telegram;

pub use blockchaincenter::BlockchainCenterClient;
pub use coingecko::{CoinGeckoClient, GlobalMarket};
pub use telegram::TelegramClient;
