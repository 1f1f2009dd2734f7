//! Application contract for AeroSurety flight-delay insurance.
//!
//! The governance and consensus layer: multi-party airline admission, the
//! flight-registration front door, oracle registration, flight-status
//! requests and the response consensus that settles policies. All durable
//! records and escrowed funds live in the storage contract (`surety-data`);
//! this contract is the only caller its allow-list admits, so the rules here
//! cannot be bypassed by invoking storage directly.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, token, Address, Env, Map,
    String, Vec,
};
use surety_data::{FlightKey, FlightStatus, SuretyDataClient, UNIT};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Minimum funding an airline must commit before it can participate in
/// governance.
pub const FUNDING_THRESHOLD: i128 = 10 * UNIT;

/// Maximum premium a passenger may pay for one policy.
pub const PREMIUM_CAP: i128 = UNIT;

/// Exact fee an oracle pays to register.
pub const REGISTRATION_FEE: i128 = UNIT;

/// Below this many registered airlines, admission is direct; from then on a
/// majority of the current membership must approve each candidate.
pub const BOOTSTRAP_AIRLINES: u32 = 4;

/// Oracle indexes are drawn from `[0, ORACLE_INDEX_SPACE)`.
pub const ORACLE_INDEX_SPACE: u64 = 10;

/// Distinct indexes assigned to each oracle at registration.
pub const INDEXES_PER_ORACLE: u32 = 3;

/// Matching responses that finalize a status request.
pub const MIN_CONSENSUS: u32 = 3;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized = 1,
    NotOperational = 2,
    Unauthorized = 3,
    InsufficientFunds = 4,
    AlreadyRegistered = 5,
    InvalidOracleIndex = 6,
    InvalidAmount = 7,
    NothingToPay = 8,
}

/// One open (or finalized) status request, keyed by `(request_index,
/// FlightKey)`. Once `open` flips to false no further responses are
/// accepted; late or duplicate submissions are dropped silently.
#[contracttype]
#[derive(Clone, Debug)]
pub struct ResponseInfo {
    pub requester: Address,
    pub open: bool,
    pub responses: Map<FlightStatus, Vec<Address>>,
}

#[contracttype]
#[derive(Clone)]
enum DataKey {
    Oracle(Address),
    Request(u32, FlightKey),
}

/// Approvals needed to admit a candidate: the ceiling of half the *current*
/// registered count. Read at call time, not snapshotted, so the bar can move
/// between votes as membership grows: majority of the current membership,
/// not of the membership when voting began.
pub fn quorum_threshold(registered: u32) -> u32 {
    (registered + 1) / 2
}

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

#[contract]
pub struct SuretyApp;

#[contractimpl]
impl SuretyApp {
    /// Initialize with the owner, the storage contract and the
    /// ledger-currency token. The storage contract must allow-list this
    /// contract's address before normal operation begins.
    pub fn initialize(env: Env, owner: Address, data: Address, token: Address) -> Result<(), Error> {
        if env.storage().instance().has(&symbol_short!("owner")) {
            return Err(Error::AlreadyInitialized);
        }
        env.storage().instance().set(&symbol_short!("owner"), &owner);
        env.storage().instance().set(&symbol_short!("data"), &data);
        env.storage().instance().set(&symbol_short!("token"), &token);

        env.events().publish((symbol_short!("init"),), (owner, data));
        Ok(())
    }

    /// Delegates to the storage contract's operational guard.
    pub fn is_operational(env: Env) -> bool {
        match read_data_addr(&env) {
            Ok(addr) => SuretyDataClient::new(&env, &addr).is_operational(),
            Err(_) => false,
        }
    }

    // -- Airline governance -------------------------------------------------

    /// Commit funding. Only an already-registered airline may fund, and the
    /// amount must meet the threshold in one transfer; anything less fails
    /// without moving funds.
    pub fn fund(env: Env, airline: Address, amount: i128) -> Result<(), Error> {
        airline.require_auth();
        let data_addr = read_data_addr(&env)?;
        let data = SuretyDataClient::new(&env, &data_addr);
        require_operational(&data)?;

        if !data.is_airline_registered(&airline) {
            return Err(Error::Unauthorized);
        }
        if amount < FUNDING_THRESHOLD {
            return Err(Error::InsufficientFunds);
        }

        let token_addr = read_token_addr(&env)?;
        token::Client::new(&env, &token_addr).transfer(&airline, &data_addr, &amount);
        data.set_airline_funded(&env.current_contract_address(), &airline);
        Ok(())
    }

    /// Register (or vote to register) a candidate airline. Returns whether
    /// the candidate is registered after this call.
    ///
    /// Below `BOOTSTRAP_AIRLINES` registered members the candidate is
    /// admitted directly. From then on each call records the requester's
    /// approval (a repeat vote counts once) and admits the candidate when
    /// distinct approvals reach the quorum threshold.
    pub fn register_airline(
        env: Env,
        requester: Address,
        candidate: Address,
    ) -> Result<bool, Error> {
        requester.require_auth();
        let data_addr = read_data_addr(&env)?;
        let data = SuretyDataClient::new(&env, &data_addr);
        require_operational(&data)?;

        if !data.is_airline_registered(&requester) || !data.is_airline_funded(&requester) {
            return Err(Error::Unauthorized);
        }
        if data.is_airline_registered(&candidate) {
            return Err(Error::AlreadyRegistered);
        }

        let self_addr = env.current_contract_address();
        let registered = data.registered_airline_count();
        if registered < BOOTSTRAP_AIRLINES {
            data.register_airline(&self_addr, &candidate);
            return Ok(true);
        }

        let approvals = data.record_approval(&self_addr, &candidate, &requester);
        if approvals >= quorum_threshold(registered) {
            data.register_airline(&self_addr, &candidate);
            return Ok(true);
        }
        Ok(false)
    }

    // -- Flight catalog -----------------------------------------------------

    /// Add a flight to the catalog. Only a funded, registered airline may
    /// register its own flights.
    pub fn register_flight(
        env: Env,
        airline: Address,
        flight_code: String,
        departure: u64,
    ) -> Result<(), Error> {
        airline.require_auth();
        let data_addr = read_data_addr(&env)?;
        let data = SuretyDataClient::new(&env, &data_addr);
        require_operational(&data)?;

        if !data.is_airline_registered(&airline) || !data.is_airline_funded(&airline) {
            return Err(Error::Unauthorized);
        }

        let key = FlightKey {
            airline: airline.clone(),
            flight_code,
            departure,
        };
        if data.flight_exists(&key) {
            return Err(Error::AlreadyRegistered);
        }
        data.register_flight(&env.current_contract_address(), &key);
        Ok(())
    }

    // -- Insurance ----------------------------------------------------------

    /// Buy a capped-value policy on a flight. One policy per passenger per
    /// flight; the premium moves into the storage contract's escrow.
    pub fn buy_insurance(
        env: Env,
        passenger: Address,
        key: FlightKey,
        premium: i128,
    ) -> Result<(), Error> {
        passenger.require_auth();
        let data_addr = read_data_addr(&env)?;
        let data = SuretyDataClient::new(&env, &data_addr);
        require_operational(&data)?;

        if premium <= 0 || premium > PREMIUM_CAP {
            return Err(Error::InvalidAmount);
        }
        if data.get_policy(&passenger, &key).is_some() {
            return Err(Error::AlreadyRegistered);
        }

        let token_addr = read_token_addr(&env)?;
        token::Client::new(&env, &token_addr).transfer(&passenger, &data_addr, &premium);
        data.buy_insurance(&env.current_contract_address(), &passenger, &key, &premium);
        Ok(())
    }

    /// Withdraw everything credited to the caller. Pull payment: the storage
    /// contract zeroes the pending balance before releasing funds. Returns
    /// the amount paid.
    pub fn pay_insurance(env: Env, passenger: Address) -> Result<i128, Error> {
        passenger.require_auth();
        let data_addr = read_data_addr(&env)?;
        let data = SuretyDataClient::new(&env, &data_addr);
        require_operational(&data)?;

        if data.pending_payout(&passenger) == 0 {
            return Err(Error::NothingToPay);
        }
        Ok(data.pay_insurance(&env.current_contract_address(), &passenger))
    }

    // -- Oracle consensus ---------------------------------------------------

    /// Register the caller as a status reporter for exactly the registration
    /// fee, and assign it three distinct request indexes.
    pub fn register_oracle(env: Env, caller: Address, fee: i128) -> Result<(), Error> {
        caller.require_auth();
        let data_addr = read_data_addr(&env)?;
        let data = SuretyDataClient::new(&env, &data_addr);
        require_operational(&data)?;

        let oracle_key = DataKey::Oracle(caller.clone());
        if env.storage().persistent().has(&oracle_key) {
            return Err(Error::AlreadyRegistered);
        }
        if fee != REGISTRATION_FEE {
            return Err(Error::InsufficientFunds);
        }

        let token_addr = read_token_addr(&env)?;
        token::Client::new(&env, &token_addr).transfer(&caller, &data_addr, &fee);

        let indexes = assign_indexes(&env);
        env.storage().persistent().set(&oracle_key, &indexes);
        Ok(())
    }

    /// The three indexes assigned to a reporter at registration, if any.
    pub fn oracle_indexes(env: Env, oracle: Address) -> Option<Vec<u32>> {
        env.storage().persistent().get(&DataKey::Oracle(oracle))
    }

    /// Open a status request for a flight. Anyone may ask. Each call mints a
    /// fresh request index from the same sampler the oracles are assigned
    /// from; a request at the same `(index, key)` replaces any earlier one,
    /// exactly as a re-request supersedes stale collection. Returns the
    /// minted index.
    pub fn fetch_flight_status(env: Env, requester: Address, key: FlightKey) -> Result<u32, Error> {
        requester.require_auth();
        let data_addr = read_data_addr(&env)?;
        let data = SuretyDataClient::new(&env, &data_addr);
        require_operational(&data)?;

        let index = draw_index(&env);
        let request = ResponseInfo {
            requester,
            open: true,
            responses: Map::new(&env),
        };
        env.storage()
            .persistent()
            .set(&DataKey::Request(index, key.clone()), &request);

        env.events().publish(
            (symbol_short!("orcl"), symbol_short!("req")),
            (index, key.airline, key.flight_code, key.departure),
        );
        Ok(index)
    }

    /// Submit one reporter's answer to an open request.
    ///
    /// Responses to unknown or already-finalized requests are dropped
    /// silently, and a reporter votes at most once per request no matter
    /// which status it previously chose; both are defined no-ops so
    /// out-of-order and duplicate delivery never fail the reporter. The
    /// first status to collect `MIN_CONSENSUS` matching responses closes the
    /// request, records the flight's outcome and triggers the credit step;
    /// a closed request accepts nothing, so a second status can never reach
    /// the threshold.
    pub fn submit_oracle_response(
        env: Env,
        oracle: Address,
        index: u32,
        key: FlightKey,
        status: FlightStatus,
    ) -> Result<(), Error> {
        oracle.require_auth();
        let data_addr = read_data_addr(&env)?;
        let data = SuretyDataClient::new(&env, &data_addr);
        require_operational(&data)?;

        let assigned: Vec<u32> = env
            .storage()
            .persistent()
            .get(&DataKey::Oracle(oracle.clone()))
            .ok_or(Error::Unauthorized)?;
        if !assigned.contains(&index) {
            return Err(Error::InvalidOracleIndex);
        }

        let request_key = DataKey::Request(index, key.clone());
        let mut request: ResponseInfo = match env.storage().persistent().get(&request_key) {
            Some(r) => r,
            None => return Ok(()),
        };
        if !request.open {
            return Ok(());
        }
        for (_, voters) in request.responses.iter() {
            if voters.contains(&oracle) {
                return Ok(());
            }
        }

        let mut voters = request
            .responses
            .get(status)
            .unwrap_or(Vec::new(&env));
        voters.push_back(oracle);
        let tally = voters.len();
        request.responses.set(status, voters);

        if tally >= MIN_CONSENSUS {
            request.open = false;
        }
        env.storage().persistent().set(&request_key, &request);

        if tally >= MIN_CONSENSUS {
            env.events().publish(
                (symbol_short!("flht"), symbol_short!("stat")),
                (
                    key.airline.clone(),
                    key.flight_code.clone(),
                    key.departure,
                    status,
                ),
            );
            data.credit_insurees(&env.current_contract_address(), &key, &status);
        }
        Ok(())
    }

    pub fn request_info(env: Env, index: u32, key: FlightKey) -> Option<ResponseInfo> {
        env.storage().persistent().get(&DataKey::Request(index, key))
    }

    pub fn flight_outcome(env: Env, key: FlightKey) -> Option<FlightStatus> {
        match read_data_addr(&env) {
            Ok(addr) => SuretyDataClient::new(&env, &addr).flight_outcome(&key),
            Err(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_data_addr(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&symbol_short!("data"))
        .ok_or(Error::Unauthorized)
}

fn read_token_addr(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&symbol_short!("token"))
        .ok_or(Error::Unauthorized)
}

fn require_operational(data: &SuretyDataClient) -> Result<(), Error> {
    if !data.is_operational() {
        return Err(Error::NotOperational);
    }
    Ok(())
}

/// One request index from the bounded domain.
///
/// Drawn from the ledger-seeded base PRNG: deterministic for a given ledger
/// (and therefore under test), but influenceable by whoever proposes the
/// enclosing block. The sampler is isolated here so the entropy policy can
/// be swapped without touching assignment or request logic.
fn draw_index(env: &Env) -> u32 {
    env.prng().gen_range::<u64>(0..ORACLE_INDEX_SPACE) as u32
}

/// Three distinct indexes, sampled without replacement.
fn assign_indexes(env: &Env) -> Vec<u32> {
    let mut indexes = Vec::new(env);
    while indexes.len() < INDEXES_PER_ORACLE {
        let idx = draw_index(env);
        if !indexes.contains(&idx) {
            indexes.push_back(idx);
        }
    }
    indexes
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
