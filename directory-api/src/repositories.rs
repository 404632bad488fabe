use crate::CITY_RESOURCE_ID;
use crate::endpoints::{
    BusinessId,
    admin::{Login, VerifyToken},
    businesses::{
        BusinessUpdate, CreateBusiness, DeleteBusiness, GetBusiness, ListBusinesses, NewBusiness,
        UpdateBusiness,
    },
    cities::DatastoreSearch,
};

pub struct BusinessRepository;

impl BusinessRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn list(&self) -> ListBusinesses {
        ListBusinesses::new()
    }

    pub fn get(&self, business_id: BusinessId) -> GetBusiness {
        GetBusiness::new(business_id)
    }

    pub fn create(&self, business: NewBusiness) -> CreateBusiness {
        CreateBusiness::new(business)
    }

    pub fn update(&self, business_id: BusinessId) -> UpdateBusiness {
        UpdateBusiness::new(business_id)
    }

    pub fn replace(&self, business_id: BusinessId, business: NewBusiness) -> UpdateBusiness {
        UpdateBusiness::with_update(business_id, BusinessUpdate::from(business))
    }

    pub fn delete(&self, business_id: BusinessId) -> DeleteBusiness {
        DeleteBusiness::new(business_id)
    }
}

pub struct AdminRepository;

impl AdminRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn login(&self, email: impl Into<String>, password: impl Into<String>) -> Login {
        Login::new(email, password)
    }

    pub fn verify(&self) -> VerifyToken {
        VerifyToken
    }
}

pub struct CityRepository;

impl CityRepository {
    pub fn new() -> Self {
        Self {}
    }

    pub fn search(&self, resource_id: &str) -> DatastoreSearch {
        DatastoreSearch::new(resource_id)
    }

    pub fn localities(&self) -> DatastoreSearch {
        DatastoreSearch::new(CITY_RESOURCE_ID)
    }
}
