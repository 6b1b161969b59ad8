//! 远端 API 客户端
//!
//! 每个端点一个方法，全部经由网关（统一附加凭证、统一错误处理）。

use crate::auth_flow::AuthBackend;
use crate::badge::CartCountSource;
use crate::error::StoreResult;
use crate::gateway::{ApiGateway, HttpTransport};
use async_trait::async_trait;
use shopfront_shared::protocol::{
    AddCartItemRequest, AuthResponse, CartEnvelope, CheckoutResponse, LoginRequest, MeResponse,
    OrderEnvelope, ProductEnvelope, ProductPayload, RegisterRequest, UpdateCartItemRequest,
};
use shopfront_shared::{AdminUser, DashboardStats, Order, Paginated, Product};
use std::rc::Rc;

pub struct StoreApi<T: HttpTransport> {
    gateway: Rc<ApiGateway<T>>,
}

impl<T: HttpTransport> Clone for StoreApi<T> {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
        }
    }
}

impl<T: HttpTransport> StoreApi<T> {
    pub fn new(gateway: Rc<ApiGateway<T>>) -> Self {
        Self { gateway }
    }

    // --- 鉴权 ---

    pub async fn login(&self, request: &LoginRequest) -> StoreResult<AuthResponse> {
        self.gateway.post("/auth/login", request).await
    }

    pub async fn register(&self, request: &RegisterRequest) -> StoreResult<AuthResponse> {
        self.gateway.post("/auth/register", request).await
    }

    pub async fn me(&self) -> StoreResult<MeResponse> {
        self.gateway.get("/auth/me").await
    }

    // --- 商品目录 ---

    pub async fn products(&self, page: u32) -> StoreResult<Paginated<Product>> {
        self.gateway
            .get(&format!("/public/products?page={}", page))
            .await
    }

    pub async fn product(&self, id: u64) -> StoreResult<Product> {
        let envelope: ProductEnvelope = self.gateway.get(&format!("/public/products/{}", id)).await?;
        Ok(envelope.data)
    }

    // --- 购物车 ---

    pub async fn cart(&self) -> StoreResult<CartEnvelope> {
        self.gateway.get("/cart").await
    }

    pub async fn add_cart_item(&self, product_id: u64, quantity: u32) -> StoreResult<()> {
        self.gateway
            .post_ignore(
                "/cart",
                &AddCartItemRequest {
                    product_id,
                    quantity,
                },
            )
            .await
    }

    pub async fn update_cart_item(&self, product_id: u64, quantity: u32) -> StoreResult<()> {
        self.gateway
            .patch_ignore(
                &format!("/cart/items/{}", product_id),
                &UpdateCartItemRequest { quantity },
            )
            .await
    }

    pub async fn remove_cart_item(&self, product_id: u64) -> StoreResult<()> {
        self.gateway
            .delete_ignore(&format!("/cart/items/{}", product_id))
            .await
    }

    pub async fn checkout(&self) -> StoreResult<CheckoutResponse> {
        self.gateway.post_empty("/checkout").await
    }

    // --- 订单 ---

    pub async fn orders(&self, page: u32) -> StoreResult<Paginated<Order>> {
        self.gateway.get(&format!("/orders?page={}", page)).await
    }

    pub async fn order(&self, id: u64) -> StoreResult<Order> {
        let envelope: OrderEnvelope = self.gateway.get(&format!("/orders/{}", id)).await?;
        Ok(envelope.data)
    }

    // --- 后台 ---

    pub async fn admin_dashboard(&self) -> StoreResult<DashboardStats> {
        self.gateway.get("/admin/dashboard").await
    }

    pub async fn admin_products(&self, page: u32) -> StoreResult<Paginated<Product>> {
        self.gateway
            .get(&format!("/admin/products?page={}", page))
            .await
    }

    pub async fn admin_orders(&self, page: u32) -> StoreResult<Paginated<Order>> {
        self.gateway
            .get(&format!("/admin/orders?page={}", page))
            .await
    }

    pub async fn admin_users(&self, page: u32) -> StoreResult<Paginated<AdminUser>> {
        self.gateway
            .get(&format!("/admin/users?page={}", page))
            .await
    }

    pub async fn admin_create_product(&self, payload: &ProductPayload) -> StoreResult<()> {
        self.gateway.post_ignore("/admin/products", payload).await
    }

    pub async fn admin_update_product(&self, id: u64, payload: &ProductPayload) -> StoreResult<()> {
        self.gateway
            .put_ignore(&format!("/admin/products/{}", id), payload)
            .await
    }

    pub async fn admin_delete_product(&self, id: u64) -> StoreResult<()> {
        self.gateway
            .delete_ignore(&format!("/admin/products/{}", id))
            .await
    }
}

// =========================================================
// 核心流程的适配实现
// =========================================================

#[async_trait(?Send)]
impl<T: HttpTransport> AuthBackend for StoreApi<T> {
    async fn login(&self, request: &LoginRequest) -> StoreResult<AuthResponse> {
        StoreApi::login(self, request).await
    }

    async fn register(&self, request: &RegisterRequest) -> StoreResult<AuthResponse> {
        StoreApi::register(self, request).await
    }

    async fn add_cart_item(&self, product_id: u64, quantity: u32) -> StoreResult<()> {
        StoreApi::add_cart_item(self, product_id, quantity).await
    }
}

#[async_trait(?Send)]
impl<T: HttpTransport> CartCountSource for StoreApi<T> {
    async fn line_item_count(&self) -> StoreResult<usize> {
        Ok(self.cart().await?.cart.len())
    }
}
