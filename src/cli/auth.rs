use crate::spotify;

pub async fn auth() {
    spotify::auth::auth().await;
}
