//! tests/alert_service_tests.rs

#[cfg(test)]
mod tests {
    use actix_rt::test;

    use crate::models::alert_model::NewAlert;
    use crate::services::interaction_service::InteractionService;
    use crate::services::user_service::UserService;
    use crate::tests::support::{memory_pool, test_store};

    #[test]
    async fn test_create_alert_publishes_full_record() {
        let mut store = test_store().await;

        let alert_id = store
            .alert_service
            .create_alert(NewAlert {
                title: Some("Flood".to_string()),
                message: Some("Evacuate now".to_string()),
                level: Some("severe".to_string()),
                recipient_groups: Some(vec!["public".to_string()]),
                sent_by: Some("system".to_string()),
                sent_by_name: Some("Ops".to_string()),
            })
            .await
            .unwrap();

        let event = store.events.try_recv().expect("se publicó AlertCreated");
        assert_eq!(event.alert_id, alert_id);
        assert_eq!(event.record.title.as_deref(), Some("Flood"));
        assert_eq!(event.record.status, "pending");

        let stored = store.alert_service.get_alert(&alert_id).await.unwrap().unwrap();
        assert_eq!(stored.recipient_groups, Some(vec!["public".to_string()]));
        assert_eq!(stored.sent_by_name.as_deref(), Some("Ops"));
        assert_eq!(stored.created_at, event.record.created_at);
    }

    #[test]
    async fn test_mark_delivered_does_not_publish() {
        let mut store = test_store().await;
        let alert_id = store
            .alert_service
            .create_alert(NewAlert::default())
            .await
            .unwrap();
        let _ = store.events.try_recv();

        store
            .alert_service
            .mark_delivered(&alert_id, 2, 1)
            .await
            .unwrap();

        assert!(store.events.try_recv().is_err());
        let stored = store.alert_service.get_alert(&alert_id).await.unwrap().unwrap();
        assert_eq!(stored.status, "delivered");
        assert_eq!(stored.notifications_sent, Some(2));
        assert_eq!(stored.notifications_failed, Some(1));
    }

    #[test]
    async fn test_unknown_alert() {
        let store = test_store().await;
        assert!(store.alert_service.get_alert("nope").await.unwrap().is_none());
        assert!(store
            .alert_service
            .mark_delivered("nope", 0, 0)
            .await
            .is_err());
    }

    #[test]
    async fn test_fcm_token_upsert() {
        let users = UserService::new(memory_pool().await);

        users.update_fcm_token("u1", "token-a").await.unwrap();
        assert_eq!(users.get_fcm_token("u1").await.unwrap().as_deref(), Some("token-a"));

        users.update_fcm_token("u1", "token-b").await.unwrap();
        assert_eq!(users.get_fcm_token("u1").await.unwrap().as_deref(), Some("token-b"));
        assert_eq!(users.get_fcm_token("u2").await.unwrap(), None);
    }

    #[test]
    async fn test_interactions_are_appended() {
        let interactions = InteractionService::new(memory_pool().await);

        let first = interactions
            .log_interaction("u1", "alert-1", "click")
            .await
            .unwrap();
        let second = interactions
            .log_interaction("u1", "alert-1", "dismiss")
            .await
            .unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(second.action, "dismiss");
        assert_eq!(interactions.count_for_alert("alert-1").await.unwrap(), 2);
        assert_eq!(interactions.count_for_alert("alert-2").await.unwrap(), 0);
    }
}
