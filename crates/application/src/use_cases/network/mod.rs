pub mod refresh_network;

pub use refresh_network::RefreshNetworkUseCase;
