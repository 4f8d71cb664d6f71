#[cfg(test)]
mod tests {
    use crate::errors::{Error, ErrorKind, Result};
    use crate::flexible::{
        FinancialsUpdate, FlexibleGoal, FlexibleGoalRepositoryTrait, FlexibleGoalService,
        FlexibleGoalServiceTrait, FlexibleTransaction, NewFlexibleGoal, PredictionStatus,
    };
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};

    // --- Mock FlexibleGoalRepository ---
    #[derive(Clone, Default)]
    struct MockFlexibleGoalRepository {
        goals: Arc<Mutex<Vec<FlexibleGoal>>>,
    }

    #[async_trait]
    impl FlexibleGoalRepositoryTrait for MockFlexibleGoalRepository {
        fn list_flexible_goals(&self) -> Result<Vec<FlexibleGoal>> {
            Ok(self.goals.lock().unwrap().clone())
        }

        fn get_flexible_goal(&self, goal_id: &str) -> Result<FlexibleGoal> {
            self.goals
                .lock()
                .unwrap()
                .iter()
                .find(|g| g.id == goal_id)
                .cloned()
                .ok_or_else(|| Error::NotFound(format!("flexible goal {}", goal_id)))
        }

        async fn insert_flexible_goal(&self, goal: FlexibleGoal) -> Result<FlexibleGoal> {
            self.goals.lock().unwrap().push(goal.clone());
            Ok(goal)
        }

        async fn update_flexible_goal(&self, goal: FlexibleGoal) -> Result<FlexibleGoal> {
            let mut goals = self.goals.lock().unwrap();
            let existing = goals
                .iter_mut()
                .find(|g| g.id == goal.id)
                .ok_or_else(|| Error::NotFound(goal.id.clone()))?;
            let transactions = std::mem::take(&mut existing.transactions);
            *existing = FlexibleGoal {
                transactions,
                ..goal
            };
            Ok(existing.clone())
        }

        async fn append_transaction(
            &self,
            transaction: FlexibleTransaction,
        ) -> Result<FlexibleTransaction> {
            let mut goals = self.goals.lock().unwrap();
            let goal = goals
                .iter_mut()
                .find(|g| g.id == transaction.goal_id)
                .ok_or_else(|| Error::NotFound(transaction.goal_id.clone()))?;
            goal.transactions.push(transaction.clone());
            Ok(transaction)
        }

        async fn delete_flexible_goal(&self, goal_id: String) -> Result<usize> {
            let mut goals = self.goals.lock().unwrap();
            let before = goals.len();
            goals.retain(|g| g.id != goal_id);
            Ok(before - goals.len())
        }
    }

    fn service() -> FlexibleGoalService {
        FlexibleGoalService::new(Arc::new(MockFlexibleGoalRepository::default()))
    }

    fn new_goal() -> NewFlexibleGoal {
        NewFlexibleGoal {
            name: "Emergency Fund".to_string(),
            target_amount: dec!(1000),
            deadline: Utc::now() + Duration::weeks(10),
            monthly_income: None,
            monthly_spending: None,
        }
    }

    #[tokio::test]
    async fn test_completion_is_rederived_after_each_mutation() {
        let svc = service();
        let goal = svc.create_goal(new_goal()).await.unwrap();
        assert_eq!(goal.current_balance, dec!(0));
        assert!(!goal.goal_completed);

        let goal = svc.deposit(&goal.goal.id, dec!(600), None).await.unwrap();
        let goal = svc
            .deposit(&goal.goal.id, dec!(400), Some("bonus".into()))
            .await
            .unwrap();
        assert_eq!(goal.current_balance, dec!(1000));
        assert!(goal.goal_completed);

        let goal = svc.withdraw(&goal.goal.id, dec!(1), None).await.unwrap();
        assert_eq!(goal.current_balance, dec!(999));
        assert!(!goal.goal_completed);
    }

    #[tokio::test]
    async fn test_withdraw_more_than_balance_is_refused() {
        let svc = service();
        let goal = svc.create_goal(new_goal()).await.unwrap();
        svc.deposit(&goal.goal.id, dec!(50), None).await.unwrap();

        let err = svc
            .withdraw(&goal.goal.id, dec!(50.01), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(svc.get_goal(&goal.goal.id).unwrap().current_balance, dec!(50));

        // The whole balance can be taken out.
        let goal = svc.withdraw(&goal.goal.id, dec!(50), None).await.unwrap();
        assert_eq!(goal.current_balance, dec!(0));
    }

    #[tokio::test]
    async fn test_rejects_non_positive_amounts_and_bad_goals() {
        let svc = service();
        let goal = svc.create_goal(new_goal()).await.unwrap();
        assert!(svc.deposit(&goal.goal.id, dec!(0), None).await.is_err());
        assert!(svc.deposit(&goal.goal.id, dec!(-5), None).await.is_err());

        let mut bad = new_goal();
        bad.target_amount = dec!(0);
        assert!(svc.create_goal(bad).await.is_err());

        let mut bad = new_goal();
        bad.monthly_income = Some(dec!(-1));
        assert!(svc.create_goal(bad).await.is_err());

        let err = svc.deposit("missing", dec!(1), None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_update_financials_keeps_unset_fields() {
        let svc = service();
        let mut input = new_goal();
        input.monthly_income = Some(dec!(40000));
        let goal = svc.create_goal(input).await.unwrap();
        svc.deposit(&goal.goal.id, dec!(10), None).await.unwrap();

        let goal = svc
            .update_financials(
                &goal.goal.id,
                FinancialsUpdate {
                    monthly_income: None,
                    monthly_spending: Some(dec!(30000)),
                },
            )
            .await
            .unwrap();
        assert_eq!(goal.goal.monthly_income, Some(dec!(40000)));
        assert_eq!(goal.goal.monthly_spending, Some(dec!(30000)));
        assert_eq!(goal.goal.transactions.len(), 1);

        let prediction = svc.prediction(&goal.goal.id).unwrap();
        assert!(prediction.capacity.is_some());
    }

    #[tokio::test]
    async fn test_achievements_and_prediction() {
        let svc = service();
        let goal = svc.create_goal(new_goal()).await.unwrap();
        let id = goal.goal.id.clone();

        let prediction = svc.prediction(&id).unwrap();
        assert_eq!(prediction.status, PredictionStatus::NotStarted);
        assert_eq!(prediction.weeks_left, 10);
        assert_eq!(prediction.required_per_week, dec!(100));

        svc.deposit(&id, dec!(300), None).await.unwrap();
        let progress = svc.achievements(&id).unwrap();
        assert!(progress.is_unlocked("first_step"));
        assert!(progress.is_unlocked("quarter"));
        assert!(!progress.is_unlocked("halfway"));
        assert_eq!(progress.total_possible, 11);

        svc.withdraw(&id, dec!(200), None).await.unwrap();
        let progress = svc.achievements(&id).unwrap();
        assert!(!progress.is_unlocked("quarter"));
        assert!(progress.is_unlocked("ten_percent"));
    }

    #[tokio::test]
    async fn test_delete_goal() {
        let svc = service();
        let goal = svc.create_goal(new_goal()).await.unwrap();
        assert_eq!(svc.delete_goal(goal.goal.id.clone()).await.unwrap(), 1);
        assert!(svc.get_goals().unwrap().is_empty());
    }
}
