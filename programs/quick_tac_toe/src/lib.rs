//! Quick Tac Toe: staked two-player tic-tac-toe with a one-time collectible for winners.
//!
//! High level flow:
//! - `init` creates the `ProgramState` singleton and the play-token mint it controls.
//! - `create_player` opens a `Player` record per wallet and airdrops the starting balance.
//! - `create_game` allocates the next game id, opens the game's escrow and stakes player X.
//! - `join_game` seats player O (who stakes too) and starts the game on turn 1.
//! - `play` places a mark; a win or a full board finalizes the game, records both results and
//!   settles the escrow in the same instruction.
//! - `claim_reward` mints a single-edition collectible to a player with at least one win, once.

use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{Mint, Token, TokenAccount};
pub mod board;
pub mod constants;
pub mod error;
use error::*;
mod escrow;
pub mod events;
use events::*;
pub mod pda;
mod reward;
pub mod state;
use constants::*;
use state::*;
declare_id!("CTfJP2WRXfSVMmaQ4Mdn78oAhNHnQPj8cM22dwY5PsyN");

#[program]
pub mod quick_tac_toe {
    use super::*;

    /// Create the program state singleton and the play-token mint (authority: program state).
    pub fn init(ctx: Context<Init>) -> Result<()> {
        let mint = ctx.accounts.mint.key();
        let program_state = &mut ctx.accounts.program_state;
        program_state.init(mint, ctx.bumps.program_state, ctx.bumps.mint);
        msg!("Initialized play token mint: {}", mint);
        emit!(ProgramInitialized {
            mint,
            version: program_state.version,
        });
        Ok(())
    }

    /// Open the caller's player record and airdrop the starting token balance.
    pub fn create_player(ctx: Context<CreatePlayer>) -> Result<()> {
        let player = ctx.accounts.player.key();
        msg!("Creating player: {}", player);
        ctx.accounts.player_pda.init(player, ctx.bumps.player_pda)?;

        escrow::airdrop(
            &ctx.accounts.mint,
            &ctx.accounts.player_token_account,
            &ctx.accounts.program_state,
            &ctx.accounts.token_program,
            INITIAL_AIRDROP,
        )?;
        ctx.accounts.player_pda.airdrop_received = true;

        emit!(PlayerCreated {
            player,
            airdrop: INITIAL_AIRDROP,
        });
        Ok(())
    }

    /// Allocate the next game id, stake player X into the new escrow and leave the game waiting.
    pub fn create_game(ctx: Context<CreateGame>) -> Result<()> {
        let game_id = ctx.accounts.program_state.take_game_id()?;
        let player_x = ctx.accounts.player_x.key();
        msg!("Creating game {} for player X: {}", game_id, player_x);

        escrow::stake(
            &ctx.accounts.player_token_account,
            &ctx.accounts.escrow,
            &ctx.accounts.mint,
            &ctx.accounts.player_x,
            &ctx.accounts.token_program,
            GAME_STAKE,
        )?;
        ctx.accounts.game.create(
            game_id,
            player_x,
            GAME_STAKE,
            ctx.bumps.game,
            ctx.bumps.escrow,
        );

        emit!(GameCreated {
            game_id,
            player_x,
            stake: GAME_STAKE,
        });
        Ok(())
    }

    /// Seat player O, stake their tokens and start the game on turn 1.
    pub fn join_game(ctx: Context<JoinGame>) -> Result<()> {
        let player_o = ctx.accounts.player_o.key();
        let game = &mut ctx.accounts.game;
        msg!("Player O {} joining game {}", player_o, game.id);
        game.join(player_o)?;
        let (game_id, stake) = (game.id, game.stake);
        game.log_board();

        escrow::stake(
            &ctx.accounts.player_token_account,
            &ctx.accounts.escrow,
            &ctx.accounts.mint,
            &ctx.accounts.player_o,
            &ctx.accounts.token_program,
            stake,
        )?;

        emit!(PlayerJoined { game_id, player_o });
        Ok(())
    }

    /// Place the signer's mark on `square`.
    ///
    /// The mark is X on odd turns and O on even turns. A completed line wins; otherwise a full
    /// board ties; otherwise the turn advances. Finishing moves update both player records and
    /// pay out the escrow before returning.
    pub fn play(ctx: Context<Play>, square: Square) -> Result<()> {
        let player = ctx.accounts.player.key();
        let status = ctx.accounts.game.play(player, &square)?;

        let game = &ctx.accounts.game;
        let opponent = game.opponent_of(&player).ok_or(TicTacToeError::NotAPlayer)?;
        let other_record = &ctx.accounts.other_player_record;
        require_keys_eq!(other_record.authority, opponent, TicTacToeError::NotAPlayer);
        pda::verify_player(&other_record.key(), &opponent, other_record.bump)?;
        let (game_id, turn) = (game.id, game.turn);
        game.log_board();
        emit!(MoveMade {
            game_id,
            player,
            row: square.row,
            column: square.column,
            turn,
        });

        let (own, other) = match status {
            GameStatus::Won => {
                msg!("Winner is: {}", player);
                emit!(GameWon {
                    game_id,
                    winner: player,
                });
                (Outcome::Win, Outcome::Loss)
            }
            GameStatus::Tie => {
                msg!("Game {} ended in a tie", game_id);
                emit!(GameTied { game_id });
                (Outcome::Tie, Outcome::Tie)
            }
            GameStatus::NotStarted | GameStatus::Active => return Ok(()),
        };
        ctx.accounts.player_record.record_result(own)?;
        ctx.accounts.other_player_record.record_result(other)?;

        let payout = escrow::settle(
            &ctx.accounts.game,
            &ctx.accounts.escrow,
            &ctx.accounts.mint,
            &ctx.accounts.player_x_token_account,
            &ctx.accounts.player_o_token_account,
            &ctx.accounts.player_x.to_account_info(),
            &ctx.accounts.token_program,
        )?;
        msg!(
            "Settled game {}: {} to X, {} to O",
            game_id,
            payout.to_x,
            payout.to_o
        );
        emit!(StakeSettled {
            game_id,
            paid_x: payout.to_x,
            paid_o: payout.to_o,
        });
        Ok(())
    }

    /// Mint the one-time winner collectible to the signer.
    ///
    /// `reward_mint` is a fresh keypair signing this transaction; the player PDA mints one unit
    /// and then gives up the mint authority for good.
    pub fn claim_reward(ctx: Context<ClaimReward>) -> Result<()> {
        let player = ctx.accounts.player.key();
        let reward_mint = ctx.accounts.reward_mint.key();
        msg!("Player {} claiming reward mint {}", player, reward_mint);
        ctx.accounts.player_pda.claim_reward(reward_mint)?;

        let bump = [ctx.accounts.player_pda.bump];
        let seeds: &[&[u8]] = &[PLAYER_SEED, player.as_ref(), &bump];
        reward::mint_reward(
            &ctx.accounts.reward_mint,
            &ctx.accounts.reward_token_account,
            &ctx.accounts.player_pda.to_account_info(),
            seeds,
            &ctx.accounts.token_program,
        )?;

        emit!(RewardClaimed {
            player,
            mint: reward_mint,
        });
        Ok(())
    }
}

#[derive(Accounts)]
/// Accounts for creating the program state and play-token mint.
pub struct Init<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(
        init,
        payer = payer,
        space = 8 + ProgramState::INIT_SPACE,
        seeds = [PROGRAM_STATE_SEED],
        bump
    )]
    pub program_state: Account<'info, ProgramState>,

    #[account(
        init,
        payer = payer,
        mint::decimals = TOKEN_DECIMALS,
        mint::authority = program_state,
        seeds = [MINT_SEED],
        bump
    )]
    pub mint: Account<'info, Mint>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
/// Accounts for opening a player record (the player signs and pays rent).
pub struct CreatePlayer<'info> {
    #[account(mut)]
    pub player: Signer<'info>,

    /// Created on first use; an existing record is rejected by the handler with `AlreadyExists`.
    #[account(
        init_if_needed,
        payer = player,
        space = 8 + Player::INIT_SPACE,
        seeds = [PLAYER_SEED, player.key().as_ref()],
        bump
    )]
    pub player_pda: Account<'info, Player>,

    #[account(
        constraint = pda::is_program_state_address(&program_state.key(), program_state.bump)
            @ TicTacToeError::AddressMismatch
    )]
    pub program_state: Account<'info, ProgramState>,

    #[account(
        mut,
        address = program_state.mint @ TicTacToeError::AddressMismatch,
        constraint = pda::is_mint_address(&mint.key(), program_state.mint_bump)
            @ TicTacToeError::AddressMismatch
    )]
    pub mint: Account<'info, Mint>,

    #[account(
        init_if_needed,
        payer = player,
        associated_token::mint = mint,
        associated_token::authority = player,
    )]
    pub player_token_account: Account<'info, TokenAccount>,

    pub associated_token_program: Program<'info, AssociatedToken>,
    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
/// Accounts for creating a game; player X signs, pays rent and stakes.
pub struct CreateGame<'info> {
    #[account(mut)]
    pub player_x: Signer<'info>,

    #[account(
        mut,
        constraint = pda::is_program_state_address(&program_state.key(), program_state.bump)
            @ TicTacToeError::AddressMismatch
    )]
    pub program_state: Account<'info, ProgramState>,

    #[account(
        init,
        payer = player_x,
        space = 8 + Game::INIT_SPACE,
        seeds = [GAME_SEED, &program_state.next_game_id.to_le_bytes()],
        bump
    )]
    pub game: Account<'info, Game>,

    #[account(
        constraint = pda::is_player_address(&player_pda.key(), &player_x.key(), player_pda.bump)
            @ TicTacToeError::AddressMismatch
    )]
    pub player_pda: Account<'info, Player>,

    #[account(address = program_state.mint @ TicTacToeError::AddressMismatch)]
    pub mint: Account<'info, Mint>,

    #[account(
        mut,
        constraint = player_token_account.mint == mint.key() @ TicTacToeError::MintMismatch,
        constraint = player_token_account.owner == player_x.key() @ TicTacToeError::MintMismatch,
    )]
    pub player_token_account: Account<'info, TokenAccount>,

    #[account(
        init,
        payer = player_x,
        token::mint = mint,
        token::authority = game,
        seeds = [ESCROW_SEED, game.key().as_ref()],
        bump
    )]
    pub escrow: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
/// Accounts for joining a waiting game as player O.
pub struct JoinGame<'info> {
    #[account(mut)]
    pub player_o: Signer<'info>,

    #[account(
        mut,
        constraint = pda::is_game_address(&game.key(), game.id, game.bump)
            @ TicTacToeError::AddressMismatch
    )]
    pub game: Account<'info, Game>,

    #[account(
        constraint = pda::is_player_address(&player_pda.key(), &player_o.key(), player_pda.bump)
            @ TicTacToeError::AddressMismatch
    )]
    pub player_pda: Account<'info, Player>,

    #[account(
        mut,
        constraint = pda::is_escrow_address(&escrow.key(), &game.key(), game.escrow_bump)
            @ TicTacToeError::AddressMismatch
    )]
    pub escrow: Account<'info, TokenAccount>,

    #[account(address = escrow.mint @ TicTacToeError::MintMismatch)]
    pub mint: Account<'info, Mint>,

    #[account(
        mut,
        constraint = player_token_account.mint == mint.key() @ TicTacToeError::MintMismatch,
        constraint = player_token_account.owner == player_o.key() @ TicTacToeError::MintMismatch,
    )]
    pub player_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
/// Accounts for a move. Both seats' token accounts ride along so a finishing move can settle.
pub struct Play<'info> {
    pub player: Signer<'info>,

    #[account(
        mut,
        constraint = pda::is_game_address(&game.key(), game.id, game.bump)
            @ TicTacToeError::AddressMismatch
    )]
    pub game: Account<'info, Game>,

    #[account(
        mut,
        constraint = pda::is_player_address(&player_record.key(), &player.key(), player_record.bump)
            @ TicTacToeError::AddressMismatch
    )]
    pub player_record: Account<'info, Player>,

    /// Must belong to the other seat of `game`; checked by the handler after the move is validated.
    #[account(mut)]
    pub other_player_record: Account<'info, Player>,

    /// CHECK: only receives the escrow's rent on settlement; pinned to seat X, who paid it.
    #[account(mut, address = game.player_x @ TicTacToeError::NotAPlayer)]
    pub player_x: UncheckedAccount<'info>,

    #[account(
        mut,
        constraint = pda::is_escrow_address(&escrow.key(), &game.key(), game.escrow_bump)
            @ TicTacToeError::AddressMismatch
    )]
    pub escrow: Account<'info, TokenAccount>,

    #[account(address = escrow.mint @ TicTacToeError::MintMismatch)]
    pub mint: Account<'info, Mint>,

    #[account(
        mut,
        constraint = player_x_token_account.mint == mint.key() @ TicTacToeError::MintMismatch,
        constraint = player_x_token_account.owner == game.player_x @ TicTacToeError::MintMismatch,
    )]
    pub player_x_token_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        constraint = player_o_token_account.mint == mint.key() @ TicTacToeError::MintMismatch,
        constraint = game.player_o.map_or(true, |o| o == player_o_token_account.owner)
            @ TicTacToeError::MintMismatch,
    )]
    pub player_o_token_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
/// Accounts for claiming the winner collectible; `reward_mint` is a fresh keypair that signs.
pub struct ClaimReward<'info> {
    #[account(mut)]
    pub player: Signer<'info>,

    #[account(
        mut,
        constraint = pda::is_player_address(&player_pda.key(), &player.key(), player_pda.bump)
            @ TicTacToeError::AddressMismatch
    )]
    pub player_pda: Account<'info, Player>,

    #[account(
        init,
        payer = player,
        mint::decimals = 0,
        mint::authority = player_pda,
    )]
    pub reward_mint: Account<'info, Mint>,

    #[account(
        init,
        payer = player,
        associated_token::mint = reward_mint,
        associated_token::authority = player,
    )]
    pub reward_token_account: Account<'info, TokenAccount>,

    pub associated_token_program: Program<'info, AssociatedToken>,
    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
}
