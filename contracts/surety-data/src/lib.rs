//! Storage contract for AeroSurety flight-delay insurance.
//!
//! Holds every durable record of the protocol (airline registrations and
//! admission approvals, the flight catalog, insurance policies and the
//! escrowed premium funds) behind an operational guard and an explicit
//! allow-list of calling contracts. Business rules (admission quorum, oracle
//! consensus, premium bounds) live in the app contract; this contract only
//! accepts state transitions from allow-listed callers and keeps them
//! consistent.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, token, Address, Env,
    String, Vec,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// One ledger-currency unit, in token base units (7 decimals).
pub const UNIT: i128 = 10_000_000;

/// Delay payout is premium * 3 / 2.
pub const PAYOUT_NUM: i128 = 3;
pub const PAYOUT_DEN: i128 = 2;

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
    AlreadyRegistered = 4,
    NothingToPay = 5,
}

/// Finalized (or not-yet-finalized) flight status codes.
///
/// The numeric values are part of the external interface: the reporter
/// process answers requests with these codes.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FlightStatus {
    Unknown = 0,
    OnTime = 10,
    LateAirline = 20,
    LateWeather = 30,
    LateTechnical = 40,
    LateOther = 50,
}

/// Composite key identifying one scheduled flight. Immutable once the flight
/// is registered; joins the catalog, status requests and policies.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FlightKey {
    pub airline: Address,
    pub flight_code: String,
    pub departure: u64,
}

/// One airline's governance record. `approvals` collects distinct admission
/// votes while the airline is a candidate and is retained for audit after
/// admission. `registered` never reverts to false.
#[contracttype]
#[derive(Clone, Debug)]
pub struct AirlineRecord {
    pub funded: bool,
    pub registered: bool,
    pub approvals: Vec<Address>,
}

/// One passenger's policy on one flight. `settled` flips when the flight's
/// outcome is applied (credited amount may be zero); `paid` flips when the
/// credited amount has been withdrawn. Both are one-way transitions.
#[contracttype]
#[derive(Clone, Debug)]
pub struct Policy {
    pub premium: i128,
    pub credited: i128,
    pub settled: bool,
    pub paid: bool,
}

#[contracttype]
#[derive(Clone)]
enum DataKey {
    Airline(Address),
    Flight(FlightKey),
    Outcome(FlightKey),
    Policy(Address, FlightKey),
    Insurees(FlightKey),
    Portfolio(Address),
}

/// Amount credited to a policy for a finalized status. Zero for every status
/// except a delay attributed to the airline.
pub fn payout_for(premium: i128, status: FlightStatus) -> i128 {
    if status == FlightStatus::LateAirline {
        premium * PAYOUT_NUM / PAYOUT_DEN
    } else {
        0
    }
}

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

#[contract]
pub struct SuretyData;

#[contractimpl]
impl SuretyData {
    /// Initialize with the contract owner, the ledger-currency token and the
    /// first airline (supplied by provisioning). The contract starts
    /// operational with an empty caller allow-list.
    pub fn initialize(
        env: Env,
        owner: Address,
        token: Address,
        first_airline: Address,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&symbol_short!("owner")) {
            return Err(Error::AlreadyInitialized);
        }

        env.storage().instance().set(&symbol_short!("owner"), &owner);
        env.storage().instance().set(&symbol_short!("token"), &token);
        env.storage().instance().set(&symbol_short!("op"), &true);
        env.storage()
            .instance()
            .set(&symbol_short!("auth"), &Vec::<Address>::new(&env));

        let record = AirlineRecord {
            funded: false,
            registered: true,
            approvals: Vec::new(&env),
        };
        env.storage()
            .persistent()
            .set(&DataKey::Airline(first_airline.clone()), &record);
        env.storage().instance().set(&symbol_short!("count"), &1u32);

        env.events()
            .publish((symbol_short!("init"),), (owner, first_airline.clone()));
        env.events()
            .publish((symbol_short!("arln"), symbol_short!("reg")), first_airline);

        Ok(())
    }

    // -- Operational guard --------------------------------------------------

    pub fn is_operational(env: Env) -> bool {
        env.storage()
            .instance()
            .get(&symbol_short!("op"))
            .unwrap_or(false)
    }

    /// Open or close the guard. Owner only. Every mutating operation on this
    /// contract and the app contract refuses to run while the guard is closed.
    pub fn set_operating_status(env: Env, value: bool) -> Result<(), Error> {
        let owner = read_owner(&env)?;
        owner.require_auth();
        env.storage().instance().set(&symbol_short!("op"), &value);
        Ok(())
    }

    // -- Caller authorization -----------------------------------------------

    /// Allow-list a calling contract for state-mutating operations. Owner
    /// only. Governance logic cannot be bypassed by invoking this contract
    /// directly: mutations from addresses outside the list are rejected.
    pub fn authorize_caller(env: Env, caller: Address) -> Result<(), Error> {
        let owner = read_owner(&env)?;
        owner.require_auth();

        let mut allowed = read_allowed(&env);
        if !allowed.contains(&caller) {
            allowed.push_back(caller);
            env.storage().instance().set(&symbol_short!("auth"), &allowed);
        }
        Ok(())
    }

    /// Remove a caller from the allow-list. Owner only.
    pub fn deauthorize_caller(env: Env, caller: Address) -> Result<(), Error> {
        let owner = read_owner(&env)?;
        owner.require_auth();

        let allowed = read_allowed(&env);
        let mut kept = Vec::new(&env);
        for a in allowed.iter() {
            if a != caller {
                kept.push_back(a);
            }
        }
        env.storage().instance().set(&symbol_short!("auth"), &kept);
        Ok(())
    }

    pub fn is_caller_authorized(env: Env, caller: Address) -> bool {
        read_allowed(&env).contains(&caller)
    }

    // -- Airline registry ---------------------------------------------------

    /// Admit an airline. The candidate's approval set, if any, is retained
    /// for audit but no longer affects state.
    pub fn register_airline(env: Env, caller: Address, candidate: Address) -> Result<(), Error> {
        require_operational(&env)?;
        require_authorized(&env, &caller)?;

        let mut record = read_airline(&env, &candidate);
        if record.registered {
            return Err(Error::AlreadyRegistered);
        }
        record.registered = true;
        env.storage()
            .persistent()
            .set(&DataKey::Airline(candidate.clone()), &record);

        let count: u32 = env
            .storage()
            .instance()
            .get(&symbol_short!("count"))
            .unwrap_or(0);
        env.storage()
            .instance()
            .set(&symbol_short!("count"), &(count + 1));

        env.events()
            .publish((symbol_short!("arln"), symbol_short!("reg")), candidate);
        Ok(())
    }

    /// Record one admission approval for a candidate. A voter appears in the
    /// approval set at most once; re-voting never double counts. Returns the
    /// distinct approval count after the call.
    pub fn record_approval(
        env: Env,
        caller: Address,
        candidate: Address,
        voter: Address,
    ) -> Result<u32, Error> {
        require_operational(&env)?;
        require_authorized(&env, &caller)?;

        let mut record = read_airline(&env, &candidate);
        if record.registered {
            return Err(Error::AlreadyRegistered);
        }
        if !record.approvals.contains(&voter) {
            record.approvals.push_back(voter);
            env.storage()
                .persistent()
                .set(&DataKey::Airline(candidate), &record);
        }
        Ok(record.approvals.len())
    }

    /// Mark a registered airline as funded. The funding transfer itself is
    /// executed by the app contract before this call.
    pub fn set_airline_funded(env: Env, caller: Address, airline: Address) -> Result<(), Error> {
        require_operational(&env)?;
        require_authorized(&env, &caller)?;

        let mut record = read_airline(&env, &airline);
        if !record.registered {
            return Err(Error::Unauthorized);
        }
        record.funded = true;
        env.storage()
            .persistent()
            .set(&DataKey::Airline(airline), &record);
        Ok(())
    }

    pub fn is_airline_registered(env: Env, airline: Address) -> bool {
        read_airline(&env, &airline).registered
    }

    pub fn is_airline_funded(env: Env, airline: Address) -> bool {
        read_airline(&env, &airline).funded
    }

    pub fn registered_airline_count(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&symbol_short!("count"))
            .unwrap_or(0)
    }

    /// Distinct approvals currently recorded for a candidate (audit view).
    pub fn approvals_for(env: Env, candidate: Address) -> u32 {
        read_airline(&env, &candidate).approvals.len()
    }

    // -- Flight catalog -----------------------------------------------------

    pub fn register_flight(env: Env, caller: Address, key: FlightKey) -> Result<(), Error> {
        require_operational(&env)?;
        require_authorized(&env, &caller)?;

        let flight_key = DataKey::Flight(key);
        if env.storage().persistent().has(&flight_key) {
            return Err(Error::AlreadyRegistered);
        }
        env.storage()
            .persistent()
            .set(&flight_key, &env.ledger().timestamp());
        Ok(())
    }

    pub fn flight_exists(env: Env, key: FlightKey) -> bool {
        env.storage().persistent().has(&DataKey::Flight(key))
    }

    // -- Insurance ledger ---------------------------------------------------

    /// Record a purchased policy. At most one policy per (passenger, flight);
    /// the premium transfer into this contract is executed by the app
    /// contract before this call.
    pub fn buy_insurance(
        env: Env,
        caller: Address,
        passenger: Address,
        key: FlightKey,
        premium: i128,
    ) -> Result<(), Error> {
        require_operational(&env)?;
        require_authorized(&env, &caller)?;

        let policy_key = DataKey::Policy(passenger.clone(), key.clone());
        if env.storage().persistent().has(&policy_key) {
            return Err(Error::AlreadyRegistered);
        }

        let policy = Policy {
            premium,
            credited: 0,
            settled: false,
            paid: false,
        };
        env.storage().persistent().set(&policy_key, &policy);

        let insurees_key = DataKey::Insurees(key.clone());
        let mut insurees: Vec<Address> = env
            .storage()
            .persistent()
            .get(&insurees_key)
            .unwrap_or(Vec::new(&env));
        insurees.push_back(passenger.clone());
        env.storage().persistent().set(&insurees_key, &insurees);

        let portfolio_key = DataKey::Portfolio(passenger.clone());
        let mut portfolio: Vec<FlightKey> = env
            .storage()
            .persistent()
            .get(&portfolio_key)
            .unwrap_or(Vec::new(&env));
        portfolio.push_back(key.clone());
        env.storage().persistent().set(&portfolio_key, &portfolio);

        env.events()
            .publish((symbol_short!("insr"), symbol_short!("buy")), (passenger, key));
        Ok(())
    }

    /// Apply a finalized flight status to every unsettled policy on the
    /// flight: a delay attributed to the airline credits premium * 3 / 2, any
    /// other status settles the policy at zero. Settled policies are never
    /// re-evaluated, so invoking this twice for the same flight mutates
    /// nothing further.
    pub fn credit_insurees(
        env: Env,
        caller: Address,
        key: FlightKey,
        status: FlightStatus,
    ) -> Result<(), Error> {
        require_operational(&env)?;
        require_authorized(&env, &caller)?;

        env.storage()
            .persistent()
            .set(&DataKey::Outcome(key.clone()), &status);

        let insurees: Vec<Address> = env
            .storage()
            .persistent()
            .get(&DataKey::Insurees(key.clone()))
            .unwrap_or(Vec::new(&env));

        for passenger in insurees.iter() {
            let policy_key = DataKey::Policy(passenger, key.clone());
            let mut policy: Policy = match env.storage().persistent().get(&policy_key) {
                Some(p) => p,
                None => continue,
            };
            if policy.settled {
                continue;
            }
            policy.credited = payout_for(policy.premium, status);
            policy.settled = true;
            env.storage().persistent().set(&policy_key, &policy);

            if policy.credited > 0 {
                env.events().publish(
                    (symbol_short!("insr"), symbol_short!("cred")),
                    (key.clone(), policy.credited),
                );
            }
        }
        Ok(())
    }

    /// Pay out everything credited to a passenger. Every policy involved is
    /// marked paid before the token leaves this contract, so a reentrant call
    /// during the transfer sees no pending balance. Returns the amount paid.
    pub fn pay_insurance(env: Env, caller: Address, passenger: Address) -> Result<i128, Error> {
        require_operational(&env)?;
        require_authorized(&env, &caller)?;

        let portfolio: Vec<FlightKey> = env
            .storage()
            .persistent()
            .get(&DataKey::Portfolio(passenger.clone()))
            .unwrap_or(Vec::new(&env));

        let mut total: i128 = 0;
        for key in portfolio.iter() {
            let policy_key = DataKey::Policy(passenger.clone(), key);
            let mut policy: Policy = match env.storage().persistent().get(&policy_key) {
                Some(p) => p,
                None => continue,
            };
            if policy.credited > 0 && !policy.paid {
                total += policy.credited;
                policy.paid = true;
                env.storage().persistent().set(&policy_key, &policy);
            }
        }

        if total == 0 {
            return Err(Error::NothingToPay);
        }

        // Effects are committed above; only now do funds leave the contract.
        let token_addr: Address = env
            .storage()
            .instance()
            .get(&symbol_short!("token"))
            .ok_or(Error::Unauthorized)?;
        let client = token::Client::new(&env, &token_addr);
        client.transfer(&env.current_contract_address(), &passenger, &total);

        env.events()
            .publish((symbol_short!("insr"), symbol_short!("paid")), (passenger, total));
        Ok(total)
    }

    pub fn get_policy(env: Env, passenger: Address, key: FlightKey) -> Option<Policy> {
        env.storage()
            .persistent()
            .get(&DataKey::Policy(passenger, key))
    }

    /// Sum of credited, not-yet-withdrawn amounts across a passenger's
    /// policies.
    pub fn pending_payout(env: Env, passenger: Address) -> i128 {
        let portfolio: Vec<FlightKey> = env
            .storage()
            .persistent()
            .get(&DataKey::Portfolio(passenger.clone()))
            .unwrap_or(Vec::new(&env));

        let mut total: i128 = 0;
        for key in portfolio.iter() {
            if let Some(policy) = env
                .storage()
                .persistent()
                .get::<DataKey, Policy>(&DataKey::Policy(passenger.clone(), key))
            {
                if policy.credited > 0 && !policy.paid {
                    total += policy.credited;
                }
            }
        }
        total
    }

    pub fn flight_outcome(env: Env, key: FlightKey) -> Option<FlightStatus> {
        env.storage().persistent().get(&DataKey::Outcome(key))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_owner(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&symbol_short!("owner"))
        .ok_or(Error::Unauthorized)
}

fn read_allowed(env: &Env) -> Vec<Address> {
    env.storage()
        .instance()
        .get(&symbol_short!("auth"))
        .unwrap_or(Vec::new(env))
}

fn read_airline(env: &Env, airline: &Address) -> AirlineRecord {
    env.storage()
        .persistent()
        .get(&DataKey::Airline(airline.clone()))
        .unwrap_or(AirlineRecord {
            funded: false,
            registered: false,
            approvals: Vec::new(env),
        })
}

fn require_operational(env: &Env) -> Result<(), Error> {
    if !SuretyData::is_operational(env.clone()) {
        return Err(Error::NotOperational);
    }
    Ok(())
}

fn require_authorized(env: &Env, caller: &Address) -> Result<(), Error> {
    caller.require_auth();
    if !read_allowed(env).contains(caller) {
        return Err(Error::Unauthorized);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use soroban_sdk::testutils::Address as _;
    use soroban_sdk::{token, Env};

    struct TestEnv<'a> {
        env: Env,
        client: SuretyDataClient<'a>,
        contract_addr: Address,
        owner: Address,
        app: Address,
        token_addr: Address,
        first_airline: Address,
    }

    fn setup() -> TestEnv<'static> {
        let env = Env::default();
        env.mock_all_auths();

        let owner = Address::generate(&env);
        let app = Address::generate(&env);
        let first_airline = Address::generate(&env);

        let contract_addr = env.register(SuretyData, ());
        let client = SuretyDataClient::new(&env, &contract_addr);

        let token_admin = Address::generate(&env);
        let token_contract = env.register_stellar_asset_contract_v2(token_admin);
        let token_addr = token_contract.address();

        client.initialize(&owner, &token_addr, &first_airline);
        client.authorize_caller(&app);

        let client = unsafe {
            core::mem::transmute::<SuretyDataClient<'_>, SuretyDataClient<'static>>(client)
        };

        TestEnv {
            env,
            client,
            contract_addr,
            owner,
            app,
            token_addr,
            first_airline,
        }
    }

    fn flight(t: &TestEnv) -> FlightKey {
        FlightKey {
            airline: t.first_airline.clone(),
            flight_code: String::from_str(&t.env, "AS1309"),
            departure: 1_700_000_000,
        }
    }

    #[test]
    fn test_initialize() {
        let t = setup();
        assert!(t.client.is_operational());
        assert_eq!(t.client.registered_airline_count(), 1);
        assert!(t.client.is_airline_registered(&t.first_airline));
        assert!(!t.client.is_airline_funded(&t.first_airline));

        assert_eq!(
            t.client
                .try_initialize(&t.owner, &t.token_addr, &t.first_airline),
            Err(Ok(Error::AlreadyInitialized))
        );
    }

    #[test]
    fn test_operating_status_gates_mutations() {
        let t = setup();
        let candidate = Address::generate(&t.env);

        t.client.set_operating_status(&false);
        assert!(!t.client.is_operational());
        assert_eq!(
            t.client.try_register_airline(&t.app, &candidate),
            Err(Ok(Error::NotOperational))
        );
        assert!(!t.client.is_airline_registered(&candidate));

        t.client.set_operating_status(&true);
        t.client.register_airline(&t.app, &candidate);
        assert!(t.client.is_airline_registered(&candidate));
    }

    #[test]
    fn test_unauthorized_caller_rejected() {
        let t = setup();
        let outsider = Address::generate(&t.env);
        let candidate = Address::generate(&t.env);

        assert_eq!(
            t.client.try_register_airline(&outsider, &candidate),
            Err(Ok(Error::Unauthorized))
        );

        t.client.deauthorize_caller(&t.app);
        assert!(!t.client.is_caller_authorized(&t.app));
        assert_eq!(
            t.client.try_register_airline(&t.app, &candidate),
            Err(Ok(Error::Unauthorized))
        );
    }

    #[test]
    fn test_register_and_fund_airline() {
        let t = setup();
        let airline = Address::generate(&t.env);

        t.client.register_airline(&t.app, &airline);
        assert_eq!(t.client.registered_airline_count(), 2);
        assert_eq!(
            t.client.try_register_airline(&t.app, &airline),
            Err(Ok(Error::AlreadyRegistered))
        );

        t.client.set_airline_funded(&t.app, &airline);
        assert!(t.client.is_airline_funded(&airline));

        // Funding an unknown address is refused.
        let stranger = Address::generate(&t.env);
        assert_eq!(
            t.client.try_set_airline_funded(&t.app, &stranger),
            Err(Ok(Error::Unauthorized))
        );
    }

    #[test]
    fn test_approvals_count_distinct_voters_once() {
        let t = setup();
        let candidate = Address::generate(&t.env);
        let voter_a = Address::generate(&t.env);
        let voter_b = Address::generate(&t.env);

        assert_eq!(t.client.record_approval(&t.app, &candidate, &voter_a), 1);
        assert_eq!(t.client.record_approval(&t.app, &candidate, &voter_a), 1);
        assert_eq!(t.client.record_approval(&t.app, &candidate, &voter_b), 2);
        assert_eq!(t.client.approvals_for(&candidate), 2);

        // Approvals survive admission as an audit trail.
        t.client.register_airline(&t.app, &candidate);
        assert_eq!(t.client.approvals_for(&candidate), 2);
        assert_eq!(
            t.client.try_record_approval(&t.app, &candidate, &voter_b),
            Err(Ok(Error::AlreadyRegistered))
        );
    }

    #[test]
    fn test_flight_catalog() {
        let t = setup();
        let key = flight(&t);

        assert!(!t.client.flight_exists(&key));
        t.client.register_flight(&t.app, &key);
        assert!(t.client.flight_exists(&key));
        assert_eq!(
            t.client.try_register_flight(&t.app, &key),
            Err(Ok(Error::AlreadyRegistered))
        );
    }

    #[test]
    fn test_policy_is_unique_per_passenger_and_flight() {
        let t = setup();
        let key = flight(&t);
        let passenger = Address::generate(&t.env);

        t.client.buy_insurance(&t.app, &passenger, &key, &UNIT);
        let policy = t.client.get_policy(&passenger, &key).unwrap();
        assert_eq!(policy.premium, UNIT);
        assert!(!policy.settled);

        assert_eq!(
            t.client.try_buy_insurance(&t.app, &passenger, &key, &UNIT),
            Err(Ok(Error::AlreadyRegistered))
        );
        // The failed purchase changed nothing.
        assert_eq!(t.client.get_policy(&passenger, &key).unwrap().premium, UNIT);
    }

    #[test]
    fn test_credit_is_idempotent() {
        let t = setup();
        let key = flight(&t);
        let passenger = Address::generate(&t.env);

        t.client.buy_insurance(&t.app, &passenger, &key, &UNIT);
        t.client
            .credit_insurees(&t.app, &key, &FlightStatus::LateAirline);

        let policy = t.client.get_policy(&passenger, &key).unwrap();
        assert_eq!(policy.credited, UNIT * 3 / 2);
        assert!(policy.settled);
        assert_eq!(t.client.pending_payout(&passenger), UNIT * 3 / 2);
        assert_eq!(
            t.client.flight_outcome(&key),
            Some(FlightStatus::LateAirline)
        );

        // Running the credit step again mutates nothing.
        t.client
            .credit_insurees(&t.app, &key, &FlightStatus::LateAirline);
        assert_eq!(t.client.pending_payout(&passenger), UNIT * 3 / 2);
    }

    #[test]
    fn test_non_airline_delay_settles_at_zero() {
        let t = setup();
        let key = flight(&t);
        let passenger = Address::generate(&t.env);

        t.client.buy_insurance(&t.app, &passenger, &key, &UNIT);
        t.client
            .credit_insurees(&t.app, &key, &FlightStatus::LateWeather);

        let policy = t.client.get_policy(&passenger, &key).unwrap();
        assert_eq!(policy.credited, 0);
        assert!(policy.settled);
        assert_eq!(t.client.pending_payout(&passenger), 0);

        // A settled policy is never re-evaluated, even for a payout status.
        t.client
            .credit_insurees(&t.app, &key, &FlightStatus::LateAirline);
        assert_eq!(t.client.get_policy(&passenger, &key).unwrap().credited, 0);
    }

    #[test]
    fn test_pay_insurance_transfers_once() {
        let t = setup();
        let key = flight(&t);
        let passenger = Address::generate(&t.env);
        let token_client = token::Client::new(&t.env, &t.token_addr);
        let token_admin = token::StellarAssetClient::new(&t.env, &t.token_addr);

        // Premiums normally arrive via the app contract's transfers; fund the
        // escrow directly here.
        token_admin.mint(&t.contract_addr, &(10 * UNIT));

        t.client.buy_insurance(&t.app, &passenger, &key, &UNIT);
        t.client
            .credit_insurees(&t.app, &key, &FlightStatus::LateAirline);

        let paid = t.client.pay_insurance(&t.app, &passenger);
        assert_eq!(paid, UNIT * 3 / 2);
        assert_eq!(token_client.balance(&passenger), UNIT * 3 / 2);
        assert_eq!(t.client.pending_payout(&passenger), 0);
        assert!(t.client.get_policy(&passenger, &key).unwrap().paid);

        // The pending balance was zeroed, so an immediate retry has nothing
        // to claim and moves no funds.
        assert_eq!(
            t.client.try_pay_insurance(&t.app, &passenger),
            Err(Ok(Error::NothingToPay))
        );
        assert_eq!(token_client.balance(&passenger), UNIT * 3 / 2);
    }

    #[test]
    fn test_pay_with_no_credit_fails() {
        let t = setup();
        let passenger = Address::generate(&t.env);
        assert_eq!(
            t.client.try_pay_insurance(&t.app, &passenger),
            Err(Ok(Error::NothingToPay))
        );
    }
}
