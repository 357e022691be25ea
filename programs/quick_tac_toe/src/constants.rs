pub const PROGRAM_STATE_SEED: &[u8] = b"program_state";

pub const MINT_SEED: &[u8] = b"play_token_mint";

pub const PLAYER_SEED: &[u8] = b"player";

pub const GAME_SEED: &[u8] = b"new_game";

pub const ESCROW_SEED: &[u8] = b"escrow";

pub const PROGRAM_VERSION: u64 = 1;

pub const FIRST_GAME_ID: u64 = 1;

pub const TOKEN_DECIMALS: u8 = 0;

pub const INITIAL_AIRDROP: u64 = 10; // play tokens minted once per new player

pub const GAME_STAKE: u64 = 1; // escrowed by each seat per game

pub const BOARD_SIDE: usize = 3; // 3x3 grid
