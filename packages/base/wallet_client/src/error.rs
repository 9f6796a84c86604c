use thiserror::Error;

#[derive(Error, Debug, PartialEq, Clone)]
pub enum WalletError {
    #[error("User rejected the request")]
    UserRejected {},

    #[error("Wallet session error: {0}")]
    SessionError(String),

    #[error("Request timeout")]
    Timeout {},

    #[error("Wallet request failed: {0}")]
    Rejected(String),
}

impl WalletError {
    /// Maps a raw wallet SDK error message onto a cause.
    pub fn classify(message: &str) -> Self {
        if message.contains("session_request") || message.contains("without any listeners") {
            WalletError::SessionError(message.to_string())
        } else if message == "Request timeout" {
            WalletError::Timeout {}
        } else if message.contains("user rejected") || message.contains("User denied") {
            WalletError::UserRejected {}
        } else {
            WalletError::Rejected(message.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_sdk_messages() {
        assert_eq!(
            WalletError::classify("MetaMask Tx Signature: User denied transaction signature."),
            WalletError::UserRejected {}
        );
        assert_eq!(
            WalletError::classify("The user rejected the request."),
            WalletError::UserRejected {}
        );
        assert_eq!(WalletError::classify("Request timeout"), WalletError::Timeout {});
        assert!(matches!(
            WalletError::classify("Emitting session_request:1 without any listeners"),
            WalletError::SessionError(_)
        ));
        assert_eq!(
            WalletError::classify("insufficient funds for gas"),
            WalletError::Rejected("insufficient funds for gas".to_string())
        );
    }
}
