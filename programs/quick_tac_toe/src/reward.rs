//! Single-edition collectible minting.
//!
//! The collectible mint is created with the claimant's player PDA as its only mint authority.
//! One unit is minted and the authority is then revoked, so the mint can never issue again.

use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_option::COption;
use anchor_spl::token::spl_token::instruction::AuthorityType;
use anchor_spl::token::{self, Mint, MintTo, SetAuthority, Token, TokenAccount};

use crate::error::TicTacToeError;

pub const REWARD_SUPPLY: u64 = 1;

/// A mint can issue the reward only while untouched and still held by `authority`.
pub fn authority_is_live(
    supply: u64,
    mint_authority: &COption<Pubkey>,
    authority: &Pubkey,
) -> bool {
    supply == 0 && *mint_authority == COption::Some(*authority)
}

/// Mint the single unit to `to`, then revoke the mint authority.
///
/// `reward_mint` is always created in the same instruction and the player record's
/// `reward_claimed` flag already stops a second claim, so the live-authority guard is a backstop
/// for a mint reaching this path any other way.
pub fn mint_reward<'info>(
    mint: &Account<'info, Mint>,
    to: &Account<'info, TokenAccount>,
    authority: &AccountInfo<'info>,
    authority_seeds: &[&[u8]],
    token_program: &Program<'info, Token>,
) -> Result<()> {
    require!(
        authority_is_live(mint.supply, &mint.mint_authority, authority.key),
        TicTacToeError::MintAuthorityExhausted
    );
    let signer_seeds = [authority_seeds];

    token::mint_to(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            MintTo {
                mint: mint.to_account_info(),
                to: to.to_account_info(),
                authority: authority.clone(),
            },
            &signer_seeds,
        ),
        REWARD_SUPPLY,
    )?;

    token::set_authority(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            SetAuthority {
                current_authority: authority.clone(),
                account_or_mint: mint.to_account_info(),
            },
            &signer_seeds,
        ),
        AuthorityType::MintTokens,
        None,
    )
}
