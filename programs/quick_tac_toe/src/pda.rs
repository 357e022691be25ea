//! Address derivation for every program-owned account.
//!
//! Addresses are `(namespace, seeds...)` PDAs of this program. Creation paths find the canonical
//! bump; every later access re-derives from the stored bump and rejects a mismatch, so a caller
//! can never slip in an account of the right type at the wrong address.

use anchor_lang::prelude::*;

use crate::constants::{ESCROW_SEED, GAME_SEED, MINT_SEED, PLAYER_SEED, PROGRAM_STATE_SEED};
use crate::error::TicTacToeError;

fn with_namespace<'a>(namespace: &'a [u8], seeds: &[&'a [u8]]) -> Vec<&'a [u8]> {
    let mut all = Vec::with_capacity(seeds.len() + 2);
    all.push(namespace);
    all.extend_from_slice(seeds);
    all
}

/// True if `address` is the PDA of `namespace` + `seeds` under `bump`.
pub fn is_derived(address: &Pubkey, namespace: &[u8], seeds: &[&[u8]], bump: u8) -> bool {
    let bump = [bump];
    let mut all = with_namespace(namespace, seeds);
    all.push(&bump);
    Pubkey::create_program_address(&all, &crate::ID)
        .map(|derived| derived == *address)
        .unwrap_or(false)
}

pub fn verify(address: &Pubkey, namespace: &[u8], seeds: &[&[u8]], bump: u8) -> Result<()> {
    require!(
        is_derived(address, namespace, seeds, bump),
        TicTacToeError::AddressMismatch
    );
    Ok(())
}

/// Fails with `AddressMismatch` unless `address` is the player record of `authority`.
pub fn verify_player(address: &Pubkey, authority: &Pubkey, bump: u8) -> Result<()> {
    verify(address, PLAYER_SEED, &[authority.as_ref()], bump)
}

pub fn is_program_state_address(address: &Pubkey, bump: u8) -> bool {
    is_derived(address, PROGRAM_STATE_SEED, &[], bump)
}

pub fn is_mint_address(address: &Pubkey, bump: u8) -> bool {
    is_derived(address, MINT_SEED, &[], bump)
}

pub fn is_player_address(address: &Pubkey, authority: &Pubkey, bump: u8) -> bool {
    is_derived(address, PLAYER_SEED, &[authority.as_ref()], bump)
}

pub fn is_game_address(address: &Pubkey, id: u64, bump: u8) -> bool {
    is_derived(address, GAME_SEED, &[&id.to_le_bytes()], bump)
}

pub fn is_escrow_address(address: &Pubkey, game: &Pubkey, bump: u8) -> bool {
    is_derived(address, ESCROW_SEED, &[game.as_ref()], bump)
}
