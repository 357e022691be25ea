use anchor_lang::prelude::*;

#[error_code]
pub enum TicTacToeError {
    #[msg("Account address does not match its derived address")]
    AddressMismatch,

    #[msg("Player account already exists")]
    AlreadyExists,

    #[msg("Player X cannot join their own game")]
    SelfJoin,

    #[msg("Game already has a second player")]
    AlreadyJoined,

    #[msg("It is not this player's turn")]
    WrongTurn,

    #[msg("Square is off the board")]
    OutOfBounds,

    #[msg("Square is already occupied")]
    CellOccupied,

    #[msg("Game is over")]
    GameOver,

    #[msg("Insufficient token balance to cover the stake")]
    InsufficientBalance,

    #[msg("Player has no recorded win")]
    NotEligible,

    #[msg("Reward already claimed")]
    AlreadyClaimed,

    #[msg("Reward mint authority already used")]
    MintAuthorityExhausted,

    #[msg("Game has not started")]
    GameNotStarted,

    #[msg("Player is not seated in this game")]
    NotAPlayer,

    #[msg("Token account has the wrong mint or owner")]
    MintMismatch,

    #[msg("Arithmetic overflow")]
    ArithmeticOverflow,
}
