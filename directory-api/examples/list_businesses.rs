use directory_api::{Client, DEFAULT_BASE_URL, DirectoryApiError, Request};

#[tokio::main]
pub async fn main() -> Result<(), DirectoryApiError> {
    let client = Client::new(DEFAULT_BASE_URL);

    let businesses = client.send(Request::businesses().list()).await?;
    for business in businesses {
        println!("{} ({}) {}", business.name, business.field_of_work, business.city);
    }
    Ok(())
}
