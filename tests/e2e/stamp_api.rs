//! 集点 API 测试套件

use reqwest::{Method, StatusCode};
use serde_json::json;

use super::{ApiClient, TestMerchant};

#[tokio::test]
#[ignore = "需要运行服务"]
async fn test_requests_without_token_are_rejected() {
    let client = ApiClient::new().unwrap();

    let (status, body) = client
        .send(Method::GET, "/api/v1/customers", None)
        .await
        .unwrap();

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
#[ignore = "需要运行服务"]
async fn test_stamp_flow_until_reward() {
    let merchant = TestMerchant::create().await.unwrap();
    let client = ApiClient::new().unwrap().login(&merchant).await.unwrap();

    let card_id = client.create_card("Cartão Coxinha", 3).await.unwrap();
    let customer_id = client
        .create_customer("Maria da Silva", "(11) 98765-4321")
        .await
        .unwrap();
    let enrollment = client.enroll(&customer_id, &card_id).await.unwrap();
    assert_eq!(enrollment["currentStamps"], 0);
    assert_eq!(enrollment["status"], "active");

    let (status, body) = client
        .grant(json!({ "customerId": customer_id, "stamps": 2 }))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["currentStamps"], 2);
    assert_eq!(body["data"]["completedNow"], false);

    let (status, body) = client
        .grant(json!({ "customerId": customer_id, "stamps": 5 }))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["currentStamps"], 3);
    assert_eq!(body["data"]["status"], "completed");
    assert_eq!(body["data"]["totalRedeemed"], 1);
    assert_eq!(body["data"]["completedNow"], true);

    let history = client
        .expect_ok(
            Method::GET,
            &format!("/api/v1/customers/{}/stamps", customer_id),
            None,
        )
        .await
        .unwrap();
    assert_eq!(history["total"], 2);

    merchant.cleanup().await;
}

#[tokio::test]
#[ignore = "需要运行服务"]
async fn test_grant_error_statuses() {
    let merchant = TestMerchant::create().await.unwrap();
    let client = ApiClient::new().unwrap().login(&merchant).await.unwrap();

    let coffee = client.create_card("Cartão Café", 10).await.unwrap();
    let lunch = client.create_card("Cartão Almoço", 8).await.unwrap();
    let customer_id = client
        .create_customer("João Pereira", "21 99876-5432")
        .await
        .unwrap();

    // 未加入任何卡片
    let (status, body) = client
        .grant(json!({ "customerId": customer_id, "stamps": 1 }))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND, "{}", body);

    client.enroll(&customer_id, &coffee).await.unwrap();
    client.enroll(&customer_id, &lunch).await.unwrap();

    // 多张卡片未指定
    let (status, body) = client
        .grant(json!({ "customerId": customer_id, "stamps": 1 }))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "AMBIGUOUS_CARD");
    assert_eq!(body["data"]["candidates"].as_array().map(Vec::len), Some(2));

    // 非整数与非正数
    for stamps in [json!(1.5), json!(0), json!(-2)] {
        let (status, _) = client
            .grant(json!({ "customerId": customer_id, "loyaltyCardId": coffee, "stamps": stamps }))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    // 其他商家的顾客
    let other = TestMerchant::create().await.unwrap();
    let other_client = ApiClient::new().unwrap().login(&other).await.unwrap();
    let (status, _) = other_client
        .grant(json!({ "customerId": customer_id, "stamps": 1 }))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);

    other.cleanup().await;
    merchant.cleanup().await;
}
