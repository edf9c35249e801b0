//! Deploys the data provider with its stand-in collaborators and runs
//! read-only scenarios against it.

use odra::casper_types::U256;
use odra::host::{HostEnv, NoArgs};
use odra::prelude::{Address, Addressable};
use odra::schema::casper_contract_schema::NamedCLType;

use odra_cli::{
    deploy::DeployScript,
    scenario::{Args, Error, Scenario, ScenarioMetadata},
    CommandArg, ContractProvider, DeployedContractsContainer, DeployerExt, OdraCli,
};

use lending_data_provider::data_provider::{LendingDataProvider, LendingDataProviderInitArgs};
use lending_data_provider::mocks::{
    MockFeeProvider, MockFeeProviderInitArgs, MockLendingCore, MockPriceOracle,
};
use lending_data_provider::state::ProposalSide;

const DEPLOY_GAS: u64 = 200_000_000_000;

/// 0.25% origination fee, WAD-scaled.
const ORIGINATION_FEE_RATE: u64 = 2_500_000_000_000_000;

pub struct DataProviderDeployScript;

impl DeployScript for DataProviderDeployScript {
    fn deploy(
        &self,
        env: &HostEnv,
        container: &mut DeployedContractsContainer,
    ) -> Result<(), odra_cli::deploy::Error> {
        let core = MockLendingCore::load_or_deploy(env, NoArgs, container, DEPLOY_GAS)?;
        let oracle = MockPriceOracle::load_or_deploy(env, NoArgs, container, DEPLOY_GAS)?;
        let fees = MockFeeProvider::load_or_deploy(
            env,
            MockFeeProviderInitArgs {
                origination_fee_rate: U256::from(ORIGINATION_FEE_RATE),
            },
            container,
            DEPLOY_GAS,
        )?;

        let provider = LendingDataProvider::load_or_deploy(
            env,
            LendingDataProviderInitArgs {
                core: core.address(),
                oracle: oracle.address(),
                fee_provider: fees.address(),
            },
            container,
            DEPLOY_GAS,
        )?;
        println!("data provider deployed at {:?}", provider.address());
        Ok(())
    }
}

/// Prints the account summary of one user.
pub struct AccountDataScenario;

impl Scenario for AccountDataScenario {
    fn args(&self) -> Vec<CommandArg> {
        vec![CommandArg::new("user", "Account to value", NamedCLType::Key)]
    }

    fn run(
        &self,
        env: &HostEnv,
        container: &DeployedContractsContainer,
        args: Args,
    ) -> Result<(), Error> {
        let provider = container.contract_ref::<LendingDataProvider>(env)?;
        let user = args.get_single::<Address>("user")?;

        let data = provider.get_user_account_data(user);
        println!("collateral:        {} ETH-wei", data.total_collateral_eth);
        println!("borrowed:          {} ETH-wei", data.total_borrow_eth);
        println!("fees:              {} ETH-wei", data.total_fees_eth);
        println!("available borrows: {} ETH-wei", data.available_borrows_eth);
        println!("ltv:               {}%", data.ltv);
        println!("liq. threshold:    {}%", data.current_liquidation_threshold);
        println!("health factor:     {}", data.health_factor);
        println!("liquidatable:      {}", provider.is_user_liquidatable(user));
        Ok(())
    }
}

impl ScenarioMetadata for AccountDataScenario {
    const NAME: &'static str = "account-data";
    const DESCRIPTION: &'static str = "Prints the valuation of a user's position";
}

/// Reports whether one borrow-side proposal can be liquidated now.
pub struct ProposalCheckScenario;

impl Scenario for ProposalCheckScenario {
    fn args(&self) -> Vec<CommandArg> {
        vec![CommandArg::new("proposal-id", "Index of the borrow proposal", NamedCLType::U64)]
    }

    fn run(
        &self,
        env: &HostEnv,
        container: &DeployedContractsContainer,
        args: Args,
    ) -> Result<(), Error> {
        let provider = container.contract_ref::<LendingDataProvider>(env)?;
        let proposal_id = args.get_single::<u64>("proposal-id")?;

        let liquidatable = provider.is_proposal_liquidatable(proposal_id, ProposalSide::Borrow);
        println!("proposal {} liquidatable: {}", proposal_id, liquidatable);
        Ok(())
    }
}

impl ScenarioMetadata for ProposalCheckScenario {
    const NAME: &'static str = "proposal-check";
    const DESCRIPTION: &'static str = "Checks whether a borrow proposal can be liquidated";
}

pub fn main() {
    OdraCli::new()
        .about("CLI tool for the lending data provider")
        .deploy(DataProviderDeployScript)
        .contract::<LendingDataProvider>()
        .contract::<MockLendingCore>()
        .contract::<MockPriceOracle>()
        .contract::<MockFeeProvider>()
        .scenario(AccountDataScenario)
        .scenario(ProposalCheckScenario)
        .build()
        .run();
}
