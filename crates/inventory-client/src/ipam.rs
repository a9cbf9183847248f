//! IP address management: reservations under `/ipam/ip`.

use inventory_core::query::QueryParams;
use inventory_core::{MacAddress, Result};
use reqwest::Method;
use std::net::IpAddr;

use crate::client::InventoryClient;
use crate::models::{IpReservation, IpamIpRequest};

const IPAM_IP_PATH: &str = "ipam/ip";

/// Client for IP reservations.
#[derive(Debug, Clone, Copy)]
pub struct IpamClient<'a> {
    client: &'a InventoryClient,
}

impl<'a> IpamClient<'a> {
    pub(crate) fn new(client: &'a InventoryClient) -> Self {
        Self { client }
    }

    /// Fetch the reservation for an address.
    ///
    /// # Errors
    ///
    /// Returns [`inventory_core::Error::NotFound`] if the address is not reserved.
    pub async fn get_ip_reservation(&self, ip: IpAddr) -> Result<IpReservation> {
        let url = self.client.item_url(IPAM_IP_PATH, &ip.to_string())?;
        self.client.get_json(url, &QueryParams::new()).await
    }

    /// Fetch every reservation held by a hardware address.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the list cannot be decoded.
    pub async fn get_ip_reservations_by_mac(&self, mac: MacAddress) -> Result<Vec<IpReservation>> {
        let url = self.client.url(IPAM_IP_PATH)?;
        self.client
            .get_json(url, &QueryParams::single("mac", mac))
            .await
    }

    /// Reserve an address for `request.hw_address`.
    ///
    /// With `ip` unset the service picks a free address in the subnet.
    ///
    /// # Errors
    ///
    /// Returns [`inventory_core::Error::Conflict`] if the address is taken.
    pub async fn create_ip_reservation(
        &self,
        request: &IpamIpRequest,
        ip: Option<IpAddr>,
    ) -> Result<IpReservation> {
        let url = match ip {
            Some(ip) => self.client.item_url(IPAM_IP_PATH, &ip.to_string())?,
            None => self.client.url(IPAM_IP_PATH)?,
        };
        self.client.send_json(Method::POST, url, request).await
    }

    /// Replace a reservation and return the stored result.
    ///
    /// # Errors
    ///
    /// Returns an error if the service rejects the update.
    pub async fn update_ip_reservation(
        &self,
        reservation: &IpReservation,
    ) -> Result<IpReservation> {
        let url = self.reservation_url(reservation)?;
        self.client.send_json(Method::PUT, url, reservation).await
    }

    /// Release a reservation.
    ///
    /// # Errors
    ///
    /// Returns [`inventory_core::Error::NotFound`] if the address is not reserved.
    pub async fn delete_ip_reservation(&self, reservation: &IpReservation) -> Result<()> {
        let url = self.reservation_url(reservation)?;
        self.client
            .send_empty::<()>(Method::DELETE, url, None)
            .await
    }

    fn reservation_url(&self, reservation: &IpReservation) -> Result<url::Url> {
        self.client
            .item_url(IPAM_IP_PATH, &reservation.ip.addr().to_string())
    }
}
