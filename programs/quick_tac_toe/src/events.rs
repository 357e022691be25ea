use anchor_lang::prelude::*;

#[event]
pub struct ProgramInitialized {
    pub mint: Pubkey,
    pub version: u64,
}

#[event]
pub struct PlayerCreated {
    pub player: Pubkey,
    pub airdrop: u64,
}

#[event]
pub struct GameCreated {
    pub game_id: u64,
    pub player_x: Pubkey,
    pub stake: u64,
}

#[event]
pub struct PlayerJoined {
    pub game_id: u64,
    pub player_o: Pubkey,
}

#[event]
pub struct MoveMade {
    pub game_id: u64,
    pub player: Pubkey,
    pub row: u8,
    pub column: u8,
    pub turn: u8,
}

#[event]
pub struct GameWon {
    pub game_id: u64,
    pub winner: Pubkey,
}

#[event]
pub struct GameTied {
    pub game_id: u64,
}

#[event]
pub struct StakeSettled {
    pub game_id: u64,
    pub paid_x: u64,
    pub paid_o: u64,
}

#[event]
pub struct RewardClaimed {
    pub player: Pubkey,
    pub mint: Pubkey,
}
