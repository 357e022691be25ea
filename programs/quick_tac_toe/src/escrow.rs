//! Stake escrow for a single game.
//!
//! Each game owns a token account at `["escrow", game]` whose authority is the game PDA itself.
//! Seats pay in on create/join; the pool leaves exactly once, when the game finalizes, and the
//! emptied escrow is closed back to player X, who paid its rent. New players get their starting
//! balance minted here too.

use anchor_lang::prelude::*;
use anchor_spl::token::{self, CloseAccount, Mint, MintTo, Token, TokenAccount, TransferChecked};

use crate::constants::{GAME_SEED, PROGRAM_STATE_SEED};
use crate::error::TicTacToeError;
use crate::state::{Game, GameStatus, ProgramState};

/// Amounts released to each seat by a settlement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Payout {
    pub to_x: u64,
    pub to_o: u64,
}

/// How a finished game splits its pool: the winner takes both stakes, a tie refunds each seat.
pub fn payout(game: &Game) -> Result<Payout> {
    let pool = game
        .stake
        .checked_mul(2)
        .ok_or(TicTacToeError::ArithmeticOverflow)?;
    match game.status {
        GameStatus::Won if game.winner == Some(game.player_x) => Ok(Payout { to_x: pool, to_o: 0 }),
        GameStatus::Won if game.winner.is_some() && game.winner == game.player_o => {
            Ok(Payout { to_x: 0, to_o: pool })
        }
        GameStatus::Won => err!(TicTacToeError::NotAPlayer),
        GameStatus::Tie => Ok(Payout {
            to_x: game.stake,
            to_o: game.stake,
        }),
        GameStatus::NotStarted | GameStatus::Active => err!(TicTacToeError::GameNotStarted),
    }
}

/// Mint the starting balance to a new player, signing as the program state PDA.
pub fn airdrop<'info>(
    mint: &Account<'info, Mint>,
    to: &Account<'info, TokenAccount>,
    mint_authority: &Account<'info, ProgramState>,
    token_program: &Program<'info, Token>,
    amount: u64,
) -> Result<()> {
    let bump = [mint_authority.bump];
    let seeds: &[&[u8]] = &[PROGRAM_STATE_SEED, &bump];
    token::mint_to(
        CpiContext::new_with_signer(
            token_program.to_account_info(),
            MintTo {
                mint: mint.to_account_info(),
                to: to.to_account_info(),
                authority: mint_authority.to_account_info(),
            },
            &[seeds],
        ),
        amount,
    )
}

/// Rejects a stake larger than the balance backing it.
pub fn covers(balance: u64, amount: u64) -> Result<()> {
    require!(balance >= amount, TicTacToeError::InsufficientBalance);
    Ok(())
}

/// Move `amount` from the signer's token account into the game escrow.
pub fn stake<'info>(
    from: &Account<'info, TokenAccount>,
    escrow: &Account<'info, TokenAccount>,
    mint: &Account<'info, Mint>,
    owner: &Signer<'info>,
    token_program: &Program<'info, Token>,
    amount: u64,
) -> Result<()> {
    covers(from.amount, amount)?;
    token::transfer_checked(
        CpiContext::new(
            token_program.to_account_info(),
            TransferChecked {
                from: from.to_account_info(),
                mint: mint.to_account_info(),
                to: escrow.to_account_info(),
                authority: owner.to_account_info(),
            },
        ),
        amount,
        mint.decimals,
    )
}

/// Release the pool of a finished game and close the escrow to `rent_receiver`, signing as the
/// game PDA. The payout always drains the pool, so the close never sees a balance.
pub fn settle<'info>(
    game: &Account<'info, Game>,
    escrow: &Account<'info, TokenAccount>,
    mint: &Account<'info, Mint>,
    player_x_tokens: &Account<'info, TokenAccount>,
    player_o_tokens: &Account<'info, TokenAccount>,
    rent_receiver: &AccountInfo<'info>,
    token_program: &Program<'info, Token>,
) -> Result<Payout> {
    let split = payout(game)?;

    let id_bytes = game.id.to_le_bytes();
    let bump = [game.bump];
    let seeds: &[&[u8]] = &[GAME_SEED, &id_bytes, &bump];
    let signer_seeds = [seeds];

    for (to, amount) in [(player_x_tokens, split.to_x), (player_o_tokens, split.to_o)] {
        if amount == 0 {
            continue;
        }
        token::transfer_checked(
            CpiContext::new_with_signer(
                token_program.to_account_info(),
                TransferChecked {
                    from: escrow.to_account_info(),
                    mint: mint.to_account_info(),
                    to: to.to_account_info(),
                    authority: game.to_account_info(),
                },
                &signer_seeds,
            ),
            amount,
            mint.decimals,
        )?;
    }

    token::close_account(CpiContext::new_with_signer(
        token_program.to_account_info(),
        CloseAccount {
            account: escrow.to_account_info(),
            destination: rent_receiver.clone(),
            authority: game.to_account_info(),
        },
        &signer_seeds,
    ))?;
    Ok(split)
}
