//! The transaction-posting pipeline.
//!
//! Posting is an ordered sequence of resolution, classification, checks,
//! and single-document mutations. The order is load-bearing: the balance
//! debit lands *before* the budget limit check, so a posting rejected at
//! the budget step leaves the debit in place and records no transaction.
//! That gap is a documented property of the engine (every mutation is a
//! lone atomic document update, there is no cross-document rollback) and
//! is pinned by the integration tests.

use std::sync::Arc;

use finbook_shared::{
    AppError, AppResult,
    types::{TransactionId, UserId},
};
use rust_decimal::Decimal;

use crate::account::AccountRepository;
use crate::budget::{Budget, BudgetService};
use crate::goal::GoalService;
use crate::user::UserRepository;

use super::repository::TransactionRepository;
use super::types::{
    NewTransaction, Transaction, TransactionKind, TransactionPatch, TransactionQuery,
    TransactionTotals,
};

/// Transaction service: orchestrates posting across accounts, budgets,
/// and goals.
pub struct TransactionService {
    transactions: Arc<dyn TransactionRepository>,
    users: Arc<dyn UserRepository>,
    accounts: Arc<dyn AccountRepository>,
    budgets: Arc<BudgetService>,
    goals: Arc<GoalService>,
}

impl TransactionService {
    /// Creates the service over its repositories and sibling services.
    #[must_use]
    pub fn new(
        transactions: Arc<dyn TransactionRepository>,
        users: Arc<dyn UserRepository>,
        accounts: Arc<dyn AccountRepository>,
        budgets: Arc<BudgetService>,
        goals: Arc<GoalService>,
    ) -> Self {
        Self {
            transactions,
            users,
            accounts,
            budgets,
            goals,
        }
    }

    /// Posts a transaction.
    ///
    /// Pipeline, in order:
    /// 1. resolve the user;
    /// 2. resolve the account and check ownership;
    /// 3. classify — outflow vs income, goal contribution or not; a goal
    ///    contribution must be an `expense` (rejected here, before any
    ///    mutation);
    /// 4. outflows must fit into spendable funds (balance minus locks);
    /// 5. look up the covering budget — only for a plain categorized
    ///    expense, never for goal contributions or transfers;
    /// 6. apply the balance effect (income credits, outflows debit, a
    ///    goal contribution leaves the balance to the goal engine);
    /// 7. record budget spend, which can still reject the posting —
    ///    after the debit, see the module doc;
    /// 8. route goal contributions through the goal engine;
    /// 9. persist the record.
    pub async fn create(&self, input: NewTransaction) -> AppResult<Transaction> {
        if input.amount <= Decimal::ZERO {
            return Err(AppError::Validation(
                "transaction amount must be positive".to_string(),
            ));
        }

        let tx = Transaction::new(input);

        self.users
            .find_by_id(tx.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {} not found", tx.user_id)))?;

        let account = self
            .accounts
            .find_by_id(tx.account_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("account {} not found", tx.account_id)))?;
        if account.user_id != tx.user_id {
            return Err(AppError::BusinessRule(format!(
                "account {} does not belong to user {}",
                tx.account_id, tx.user_id
            )));
        }

        let is_outflow = tx.kind.is_outflow();
        let is_goal_contribution = tx.goal_id.is_some();
        if is_goal_contribution && tx.kind != TransactionKind::Expense {
            return Err(AppError::BusinessRule(
                "goal contributions must be expense transactions".to_string(),
            ));
        }

        if is_outflow {
            let available = account.available();
            if available < tx.amount {
                return Err(AppError::BusinessRule(format!(
                    "insufficient balance: available {available}, requested {}",
                    tx.amount
                )));
            }
        }

        let budget = self.covering_budget(&tx, is_goal_contribution).await?;

        match tx.kind {
            TransactionKind::Income => {
                self.accounts
                    .adjust_balance(tx.account_id, tx.amount)
                    .await?
                    .ok_or_else(|| {
                        AppError::NotFound(format!("account {} not found", tx.account_id))
                    })?;
            }
            TransactionKind::Expense | TransactionKind::Transfer => {
                // A goal contribution does not debit here; the goal
                // engine is the only fund movement for it.
                if !is_goal_contribution {
                    self.accounts
                        .adjust_balance(tx.account_id, -tx.amount)
                        .await?
                        .ok_or_else(|| {
                            AppError::NotFound(format!("account {} not found", tx.account_id))
                        })?;
                }
            }
        }

        if let Some(budget) = budget {
            self.budgets.apply_expense(&budget, tx.amount).await?;
        }

        if let Some(goal_id) = tx.goal_id {
            self.goals.apply_contribution(goal_id, tx.amount).await?;
        }

        self.transactions.insert(&tx).await?;
        Ok(tx)
    }

    /// The budget covering this posting, if rules call for one: a plain
    /// `expense` with a category that is not a goal contribution.
    async fn covering_budget(
        &self,
        tx: &Transaction,
        is_goal_contribution: bool,
    ) -> AppResult<Option<Budget>> {
        if is_goal_contribution || tx.kind != TransactionKind::Expense {
            return Ok(None);
        }
        let Some(category) = &tx.category else {
            return Ok(None);
        };
        self.budgets
            .get_for(tx.user_id, category, tx.date.date_naive())
            .await
    }

    /// Fetches a transaction by ID.
    pub async fn get(&self, id: TransactionId) -> AppResult<Transaction> {
        self.transactions
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("transaction {id} not found")))
    }

    /// A user's transactions, newest first.
    pub async fn list(&self, user_id: UserId) -> AppResult<Vec<Transaction>> {
        self.transactions
            .search(user_id, &TransactionQuery::default())
            .await
    }

    /// Searches a user's transactions.
    pub async fn search(
        &self,
        user_id: UserId,
        query: &TransactionQuery,
    ) -> AppResult<Vec<Transaction>> {
        self.transactions.search(user_id, query).await
    }

    /// Income and expense totals for a user.
    pub async fn totals(&self, user_id: UserId) -> AppResult<TransactionTotals> {
        self.transactions.totals_for_user(user_id).await
    }

    /// Applies a partial update to a transaction record.
    ///
    /// Posting side effects are never replayed: an amount change edits
    /// the record only, balances and budgets keep their history.
    pub async fn update(
        &self,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> AppResult<Transaction> {
        self.transactions
            .update(id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("transaction {id} not found")))
    }

    /// Deletes a transaction record. Side effects are not reversed.
    pub async fn delete(&self, id: TransactionId) -> AppResult<()> {
        if self.transactions.delete(id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("transaction {id} not found")))
        }
    }
}
